pub mod auth;
pub mod chat;
pub mod countries;
pub mod dashboard;
pub mod enterprises;
pub mod projects;
pub mod students;
pub mod voomp;

pub use auth::AuthService;
pub use chat::{ChatManager, ChatService};
pub use countries::CountryService;
pub use dashboard::DashboardService;
pub use enterprises::EnterpriseService;
pub use projects::ProjectService;
pub use students::StudentService;
pub use voomp::VoompService;

use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::cache::ObjectCache;
use crate::errors::TkseError;
use crate::middlewares::RequireJWT;
use crate::middlewares::require_jwt::{account_cache_key, bearer_token};
use crate::models::{ApiResponse, ErrorCode, auth::AuthAccount};

/// 存储层错误转换为统一响应
pub(crate) fn error_response(err: &TkseError) -> HttpResponse {
    if err.is_internal() {
        error!("{}", err.format_simple());
    }
    HttpResponse::build(err.status_code()).json(ApiResponse::error_empty(
        err.api_code(),
        err.client_message(),
    ))
}

/// 冲突类错误使用业务码 `code`，其它错误同 [`error_response`]
pub(crate) fn error_response_as(err: &TkseError, code: ErrorCode) -> HttpResponse {
    match err {
        TkseError::Conflict(msg) => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(code, msg.as_str()))
        }
        _ => error_response(err),
    }
}

pub(crate) fn validation_response(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::InvalidArgument,
        message,
    ))
}

/// 读取当前登录账号
pub(crate) fn current_account(request: &HttpRequest) -> Result<AuthAccount, HttpResponse> {
    RequireJWT::extract_account(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unable to resolve the authenticated account",
        ))
    })
}

/// 只允许账号操作自己的资源
pub(crate) fn ensure_self(account: &AuthAccount, target_id: Uuid) -> Result<(), HttpResponse> {
    if account.id == target_id {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You can only access your own account",
        )))
    }
}

/// 资料变更或删除后清除当前令牌对应的账号缓存
pub(crate) async fn invalidate_account_cache(request: &HttpRequest) {
    let Some(token) = bearer_token(request) else {
        return;
    };
    if let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
        cache.remove(&account_cache_key(&token)).await;
    }
}

/// 去除首尾空白并转为小写
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::AccountType;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_response_status() {
        let resp = error_response(&TkseError::not_found("Project not found"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = error_response(&TkseError::database_operation("boom"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_as_only_overrides_conflict() {
        let resp = error_response_as(
            &TkseError::conflict("twice"),
            ErrorCode::SubmissionAlreadyPending,
        );
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = error_response_as(
            &TkseError::validation("bad"),
            ErrorCode::SubmissionAlreadyPending,
        );
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_ensure_self() {
        let account = AuthAccount {
            id: Uuid::new_v4(),
            account_type: AccountType::Student,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
        };
        assert!(ensure_self(&account, account.id).is_ok());
        assert!(ensure_self(&account, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }
}
