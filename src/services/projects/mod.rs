pub mod manage;
pub mod publish;
pub mod status;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::projects::requests::{
    ProjectListQuery, PublishProjectRequest, UpdateProjectRequest, UpdateProjectStatusRequest,
};
use crate::models::{ApiResponse, ErrorCode, projects::entities::ProjectDetail};
use crate::services::error_response;
use crate::storage::Storage;

pub struct ProjectService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProjectService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_projects(
        &self,
        request: &HttpRequest,
        query: ProjectListQuery,
    ) -> ActixResult<HttpResponse> {
        manage::list_projects(self, request, query).await
    }

    pub async fn publish_project(
        &self,
        request: &HttpRequest,
        req: PublishProjectRequest,
    ) -> ActixResult<HttpResponse> {
        publish::publish_project(self, request, req).await
    }

    pub async fn get_project(
        &self,
        request: &HttpRequest,
        project_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        manage::get_project(self, request, project_id).await
    }

    pub async fn update_project(
        &self,
        request: &HttpRequest,
        project_id: Uuid,
        req: UpdateProjectRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_project(self, request, project_id, req).await
    }

    pub async fn delete_project(
        &self,
        request: &HttpRequest,
        project_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        manage::delete_project(self, request, project_id).await
    }

    pub async fn update_project_status(
        &self,
        request: &HttpRequest,
        project_id: Uuid,
        req: UpdateProjectStatusRequest,
    ) -> ActixResult<HttpResponse> {
        status::update_project_status(self, request, project_id, req).await
    }

    /// 加载项目并确认归属当前企业
    pub(crate) async fn load_owned_project(
        &self,
        request: &HttpRequest,
        project_id: Uuid,
        enterprise_id: Uuid,
    ) -> Result<ProjectDetail, HttpResponse> {
        let storage = self.get_storage(request);
        match storage.get_project(project_id).await {
            Ok(Some(project)) if project.project.enterprise_id == enterprise_id => Ok(project),
            Ok(Some(_)) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "Project belongs to another enterprise",
            ))),
            Ok(None) => Err(project_not_found()),
            Err(e) => Err(error_response(&e)),
        }
    }
}

pub(crate) fn project_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::NotFound,
        "Project not found",
    ))
}
