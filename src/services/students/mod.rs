pub mod dashboard;
pub mod profile;
pub mod projects;
pub mod register;
pub mod submissions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::auth::AuthAccount;
use crate::models::students::requests::{
    CreateStudentRequest, StudentListQuery, UpdateStudentRequest,
};
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
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

    pub async fn register(
        &self,
        request: &HttpRequest,
        req: CreateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        register::register_student(self, request, req).await
    }

    pub async fn list_students(
        &self,
        request: &HttpRequest,
        query: StudentListQuery,
    ) -> ActixResult<HttpResponse> {
        profile::list_students(self, request, query).await
    }

    pub async fn get_student(
        &self,
        request: &HttpRequest,
        student_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        profile::get_student(self, request, student_id).await
    }

    pub async fn update_student(
        &self,
        request: &HttpRequest,
        student_id: Uuid,
        req: UpdateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        profile::update_student(self, request, student_id, req).await
    }

    pub async fn delete_student(
        &self,
        request: &HttpRequest,
        student_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        profile::delete_student(self, request, student_id).await
    }

    pub async fn dismiss_welcome(
        &self,
        request: &HttpRequest,
        student_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        profile::dismiss_welcome(self, request, student_id).await
    }

    pub async fn list_visible_projects(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        projects::list_visible_projects(self, request).await
    }

    pub async fn list_student_projects(
        &self,
        request: &HttpRequest,
        student_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        projects::list_student_projects(self, request, student_id).await
    }

    pub async fn join_project(
        &self,
        request: &HttpRequest,
        student_id: Uuid,
        project_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        projects::join_project(self, request, student_id, project_id).await
    }

    pub async fn list_deliverables(
        &self,
        request: &HttpRequest,
        student_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        projects::list_deliverables(self, request, student_id).await
    }

    pub async fn get_dashboard(
        &self,
        request: &HttpRequest,
        student_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        dashboard::get_student_dashboard(self, request, student_id).await
    }

    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        student_id: Uuid,
        req: CreateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::create_submission(self, request, student_id, req).await
    }

    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        student_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        submissions::list_submissions(self, request, student_id).await
    }
}

/// 学生本人或任意企业可查看学生的项目视图
pub(crate) fn ensure_can_view(account: &AuthAccount, student_id: Uuid) -> Result<(), HttpResponse> {
    if account.is_enterprise() || account.id == student_id {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You can only view your own data",
        )))
    }
}

pub(crate) fn student_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::NotFound,
        "Student not found",
    ))
}
