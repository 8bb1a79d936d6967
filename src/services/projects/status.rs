use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::ProjectService;
use crate::models::projects::entities::ProjectStatus;
use crate::models::projects::requests::UpdateProjectStatusRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_account, error_response_as, validation_response};

pub async fn update_project_status(
    service: &ProjectService,
    request: &HttpRequest,
    project_id: Uuid,
    req: UpdateProjectStatusRequest,
) -> ActixResult<HttpResponse> {
    let account = match current_account(request) {
        Ok(account) => account,
        Err(resp) => return Ok(resp),
    };

    let next = match req.status.trim().parse::<ProjectStatus>() {
        Ok(status) => status,
        Err(msg) => return Ok(validation_response(msg)),
    };

    if let Err(resp) = service
        .load_owned_project(request, project_id, account.id)
        .await
    {
        return Ok(resp);
    }

    let storage = service.get_storage(request);
    match storage.transition_project(project_id, next).await {
        Ok(project) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            project,
            "Project status updated successfully",
        ))),
        Err(e) => Ok(error_response_as(&e, ErrorCode::InvalidTransition)),
    }
}
