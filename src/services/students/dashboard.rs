use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::{StudentService, ensure_can_view};
use crate::models::ApiResponse;
use crate::services::{current_account, error_response};

pub async fn get_student_dashboard(
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
    match storage.student_dashboard(student_id).await {
        Ok(dashboard) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            dashboard,
            "Dashboard retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
