pub mod profile;
pub mod register;
pub mod review;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::enterprises::requests::{CreateEnterpriseRequest, UpdateEnterpriseRequest};
use crate::models::submissions::requests::{SubmissionReviewQuery, ValidateSubmissionRequest};
use crate::storage::Storage;

pub struct EnterpriseService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnterpriseService {
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
        req: CreateEnterpriseRequest,
    ) -> ActixResult<HttpResponse> {
        register::register_enterprise(self, request, req).await
    }

    pub async fn get_enterprise(
        &self,
        request: &HttpRequest,
        enterprise_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        profile::get_enterprise(self, request, enterprise_id).await
    }

    pub async fn update_enterprise(
        &self,
        request: &HttpRequest,
        enterprise_id: Uuid,
        req: UpdateEnterpriseRequest,
    ) -> ActixResult<HttpResponse> {
        profile::update_enterprise(self, request, enterprise_id, req).await
    }

    pub async fn delete_enterprise(
        &self,
        request: &HttpRequest,
        enterprise_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        profile::delete_enterprise(self, request, enterprise_id).await
    }

    pub async fn list_enterprise_projects(
        &self,
        request: &HttpRequest,
        enterprise_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        profile::list_enterprise_projects(self, request, enterprise_id).await
    }

    pub async fn list_enterprises_by_student(
        &self,
        request: &HttpRequest,
        student_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        profile::list_enterprises_by_student(self, request, student_id).await
    }

    pub async fn list_submissions_to_validate(
        &self,
        request: &HttpRequest,
        query: SubmissionReviewQuery,
    ) -> ActixResult<HttpResponse> {
        review::list_submissions_to_validate(self, request, query).await
    }

    pub async fn validate_submission(
        &self,
        request: &HttpRequest,
        submission_id: Uuid,
        req: ValidateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        review::validate_submission(self, request, submission_id, req).await
    }
}
