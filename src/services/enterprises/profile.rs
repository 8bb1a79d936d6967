use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::EnterpriseService;
use crate::models::enterprises::requests::UpdateEnterpriseRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    current_account, ensure_self, error_response, invalidate_account_cache, normalize_email,
    validation_response,
};
use crate::services::students::ensure_can_view;
use crate::utils::validate::{validate_email, validate_name};

fn enterprise_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::NotFound,
        "Enterprise not found",
    ))
}

pub async fn get_enterprise(
    service: &EnterpriseService,
    request: &HttpRequest,
    enterprise_id: Uuid,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.get_enterprise_by_id(enterprise_id).await {
        Ok(Some(enterprise)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enterprise,
            "Enterprise retrieved successfully",
        ))),
        Ok(None) => Ok(enterprise_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_enterprise(
    service: &EnterpriseService,
    request: &HttpRequest,
    enterprise_id: Uuid,
    mut req: UpdateEnterpriseRequest,
) -> ActixResult<HttpResponse> {
    let account = match current_account(request) {
        Ok(account) => account,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_self(&account, enterprise_id) {
        return Ok(resp);
    }

    if let Some(name) = req.name.as_deref() {
        if let Err(msg) = validate_name(name) {
            return Ok(validation_response(msg));
        }
        req.name = Some(name.trim().to_string());
    }
    if let Some(email) = req.email.as_deref() {
        if let Err(msg) = validate_email(email) {
            return Ok(validation_response(msg));
        }
        req.email = Some(normalize_email(email));
    }

    let storage = service.get_storage(request);
    match storage.update_enterprise(enterprise_id, req).await {
        Ok(Some(enterprise)) => {
            invalidate_account_cache(request).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                enterprise,
                "Enterprise updated successfully",
            )))
        }
        Ok(None) => Ok(enterprise_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_enterprise(
    service: &EnterpriseService,
    request: &HttpRequest,
    enterprise_id: Uuid,
) -> ActixResult<HttpResponse> {
    let account = match current_account(request) {
        Ok(account) => account,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_self(&account, enterprise_id) {
        return Ok(resp);
    }

    let storage = service.get_storage(request);
    match storage.delete_enterprise(enterprise_id).await {
        Ok(true) => {
            invalidate_account_cache(request).await;
            info!("Enterprise {} deactivated", enterprise_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Enterprise deleted successfully",
            )))
        }
        Ok(false) => Ok(enterprise_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn list_enterprise_projects(
    service: &EnterpriseService,
    request: &HttpRequest,
    enterprise_id: Uuid,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_enterprise_by_id(enterprise_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(enterprise_not_found()),
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.list_enterprise_projects(enterprise_id).await {
        Ok(projects) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            projects,
            "Projects retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

// 学生参与过项目的企业，列表为空时按未找到处理
pub async fn list_enterprises_by_student(
    service: &EnterpriseService,
    request: &HttpRequest,
    student_id: Uuid,
) -> ActixResult<HttpResponse> {
    let account = match current_account(request) {
        Ok(account) => account,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_can_view(&account, student_id) {
        return Ok(resp);
    }

    let storage = service.get_storage(request);
    match storage.list_enterprises_by_student(student_id).await {
        Ok(enterprises) if enterprises.is_empty() => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::NotFound, "No enterprises found for this student"),
        )),
        Ok(enterprises) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enterprises,
            "Enterprises retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
