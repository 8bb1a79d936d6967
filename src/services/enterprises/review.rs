use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::EnterpriseService;
use crate::models::submissions::requests::{SubmissionReviewQuery, ValidateSubmissionRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_account, error_response};

pub async fn list_submissions_to_validate(
    service: &EnterpriseService,
    request: &HttpRequest,
    query: SubmissionReviewQuery,
) -> ActixResult<HttpResponse> {
    let account = match current_account(request) {
        Ok(account) => account,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match storage.list_submissions_for_review(account.id, query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Submissions retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn validate_submission(
    service: &EnterpriseService,
    request: &HttpRequest,
    submission_id: Uuid,
    req: ValidateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let account = match current_account(request) {
        Ok(account) => account,
        Err(resp) => return Ok(resp),
    };

    // 审核人必须是当前企业本身
    if req.validator_id != account.id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Validator must be the authenticated enterprise",
        )));
    }

    let storage = service.get_storage(request);

    match storage.get_submission_owner(submission_id).await {
        Ok(Some(owner)) if owner == account.id => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "Submission does not belong to your projects",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotFound,
                "Submission not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    match storage
        .validate_submission(submission_id, req.validator_id, &req.status, req.feedback)
        .await
    {
        Ok(submission) => {
            info!(
                "Submission {} marked {} by enterprise {}",
                submission.id, submission.status, account.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                submission,
                "Submission validated successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
