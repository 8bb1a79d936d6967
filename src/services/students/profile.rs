use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{StudentService, student_not_found};
use crate::models::ApiResponse;
use crate::models::students::requests::{StudentListQuery, UpdateStudentRequest};
use crate::services::{
    current_account, ensure_self, error_response, invalidate_account_cache, normalize_email,
    validation_response,
};
use crate::utils::validate::{validate_email, validate_name};

pub async fn list_students(
    service: &StudentService,
    request: &HttpRequest,
    query: StudentListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.list_students_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Students retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: Uuid,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student retrieved successfully",
        ))),
        Ok(None) => Ok(student_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: Uuid,
    mut req: UpdateStudentRequest,
) -> ActixResult<HttpResponse> {
    let account = match current_account(request) {
        Ok(account) => account,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_self(&account, student_id) {
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
    match storage.update_student(student_id, req).await {
        Ok(Some(student)) => {
            invalidate_account_cache(request).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                student,
                "Student updated successfully",
            )))
        }
        Ok(None) => Ok(student_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: Uuid,
) -> ActixResult<HttpResponse> {
    let account = match current_account(request) {
        Ok(account) => account,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_self(&account, student_id) {
        return Ok(resp);
    }

    let storage = service.get_storage(request);
    match storage.delete_student(student_id).await {
        Ok(true) => {
            invalidate_account_cache(request).await;
            info!("Student {} deactivated", student_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Student deleted successfully",
            )))
        }
        Ok(false) => Ok(student_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn dismiss_welcome(
    service: &StudentService,
    request: &HttpRequest,
    student_id: Uuid,
) -> ActixResult<HttpResponse> {
    let account = match current_account(request) {
        Ok(account) => account,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_self(&account, student_id) {
        return Ok(resp);
    }

    let storage = service.get_storage(request);
    match storage.dismiss_student_welcome(student_id).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Welcome dismissed",
        ))),
        Ok(None) => Ok(student_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}
