use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{StudentService, ensure_can_view};
use crate::errors::TkseError;
use crate::models::submissions::{entities::ALREADY_APPROVED, requests::CreateSubmissionRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_account, ensure_self, error_response, error_response_as};

/// 提交冲突对应的业务码
fn conflict_code(err: &TkseError) -> ErrorCode {
    match err {
        TkseError::Conflict(msg) if msg == ALREADY_APPROVED => ErrorCode::TaskAlreadyApproved,
        _ => ErrorCode::SubmissionAlreadyPending,
    }
}

pub async fn create_submission(
    service: &StudentService,
    request: &HttpRequest,
    student_id: Uuid,
    mut req: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let account = match current_account(request) {
        Ok(account) => account,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_self(&account, student_id) {
        return Ok(resp);
    }

    req.submission_link = req.submission_link.trim().to_string();

    let storage = service.get_storage(request);
    match storage.create_submission(student_id, req).await {
        Ok(submission) => {
            info!(
                "Student {} submitted task {} ({})",
                student_id, submission.task_id, submission.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                submission,
                "Submission created successfully",
            )))
        }
        Err(e) => Ok(error_response_as(&e, conflict_code(&e))),
    }
}

pub async fn list_submissions(
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
    match storage.list_student_submissions(student_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            items,
            "Submissions retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::ALREADY_PENDING;

    #[test]
    fn test_conflict_codes_distinguish_pending_and_approved() {
        assert_eq!(
            conflict_code(&TkseError::conflict(ALREADY_PENDING)),
            ErrorCode::SubmissionAlreadyPending
        );
        assert_eq!(
            conflict_code(&TkseError::conflict(ALREADY_APPROVED)),
            ErrorCode::TaskAlreadyApproved
        );
    }
}
