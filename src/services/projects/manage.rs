use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{ProjectService, project_not_found};
use crate::models::ApiResponse;
use crate::models::projects::requests::{ProjectListQuery, UpdateProjectRequest};
use crate::services::{current_account, error_response, validation_response};
use crate::utils::validate::validate_name;

pub async fn list_projects(
    service: &ProjectService,
    request: &HttpRequest,
    query: ProjectListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.list_projects_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Projects retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_project(
    service: &ProjectService,
    request: &HttpRequest,
    project_id: Uuid,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.get_project(project_id).await {
        Ok(Some(project)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            project,
            "Project retrieved successfully",
        ))),
        Ok(None) => Ok(project_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_project(
    service: &ProjectService,
    request: &HttpRequest,
    project_id: Uuid,
    mut req: UpdateProjectRequest,
) -> ActixResult<HttpResponse> {
    let account = match current_account(request) {
        Ok(account) => account,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = service
        .load_owned_project(request, project_id, account.id)
        .await
    {
        return Ok(resp);
    }

    if let Some(name) = req.name.as_deref() {
        if let Err(msg) = validate_name(name) {
            return Ok(validation_response(msg));
        }
        req.name = Some(name.trim().to_string());
    }

    let storage = service.get_storage(request);
    match storage.update_project(project_id, req).await {
        Ok(Some(project)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            project,
            "Project updated successfully",
        ))),
        Ok(None) => Ok(project_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_project(
    service: &ProjectService,
    request: &HttpRequest,
    project_id: Uuid,
) -> ActixResult<HttpResponse> {
    let account = match current_account(request) {
        Ok(account) => account,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = service
        .load_owned_project(request, project_id, account.id)
        .await
    {
        return Ok(resp);
    }

    let storage = service.get_storage(request);
    match storage.delete_project(project_id).await {
        Ok(true) => {
            info!("Project {} deleted by enterprise {}", project_id, account.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Project deleted successfully",
            )))
        }
        Ok(false) => Ok(project_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}
