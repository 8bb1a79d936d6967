use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{StudentService, ensure_can_view};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_account, ensure_self, error_response, error_response_as};

pub async fn list_visible_projects(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.list_visible_projects().await {
        Ok(projects) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            projects,
            "Projects retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn list_student_projects(
    service: &StudentService,
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
    match storage.list_student_projects(student_id).await {
        Ok(projects) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            projects,
            "Projects retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn join_project(
    service: &StudentService,
    request: &HttpRequest,
    student_id: Uuid,
    project_id: Uuid,
) -> ActixResult<HttpResponse> {
    let account = match current_account(request) {
        Ok(account) => account,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_self(&account, student_id) {
        return Ok(resp);
    }

    let storage = service.get_storage(request);
    match storage.join_project(student_id, project_id).await {
        Ok(link) => {
            info!("Student {} joined project {}", student_id, project_id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(link, "Joined project successfully")))
        }
        Err(e) => Ok(error_response_as(&e, ErrorCode::ProjectNotJoinable)),
    }
}

pub async fn list_deliverables(
    service: &StudentService,
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
    match storage.list_student_deliverables(student_id).await {
        Ok(deliverables) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            deliverables,
            "Deliverables retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
