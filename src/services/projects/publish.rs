use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ProjectService;
use crate::models::ApiResponse;
use crate::models::projects::requests::PublishProjectRequest;
use crate::services::{current_account, error_response};

pub async fn publish_project(
    service: &ProjectService,
    request: &HttpRequest,
    req: PublishProjectRequest,
) -> ActixResult<HttpResponse> {
    let account = match current_account(request) {
        Ok(account) => account,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match storage.publish_project(account.id, req).await {
        Ok(project) => {
            info!(
                "Project {} published by enterprise {} with {} deliverable(s)",
                project.project.id,
                account.id,
                project.deliverables.len()
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(project, "Project published successfully")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
