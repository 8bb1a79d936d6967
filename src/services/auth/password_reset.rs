use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{
        AccountType,
        requests::{ForgotPasswordRequest, ResetPasswordRequest},
        responses::ResetTokenValidationResponse,
    },
};
use crate::services::{error_response, normalize_email, validation_response};
use crate::utils::{password::hash_password, validate::validate_password};

use super::{AuthService, mailer::build_reset_link};

pub async fn handle_forgot_password(
    service: &AuthService,
    account_type: AccountType,
    forgot_request: ForgotPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();
    let email = normalize_email(&forgot_request.email);

    let account_id = match account_type {
        AccountType::Enterprise => storage
            .get_enterprise_by_email(&email)
            .await
            .map(|found| found.map(|e| e.id)),
        AccountType::Student => storage
            .get_student_by_email(&email)
            .await
            .map(|found| found.map(|s| s.id)),
    };

    let account_id = match account_id {
        Ok(Some(id)) => id,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotFound,
                "Account not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    let token = match storage
        .create_reset_token(
            &email,
            account_type,
            account_id,
            config.password_reset.token_ttl_minutes,
        )
        .await
    {
        Ok(token) => token,
        Err(e) => return Ok(error_response(&e)),
    };

    let link = build_reset_link(&config.password_reset.frontend_reset_url, &token.token);
    if let Err(e) = service
        .get_mailer(request)
        .send_password_reset(&email, account_type, &link)
        .await
    {
        warn!("Failed to deliver reset email to {}: {}", email, e);
        if let Err(cleanup) = storage.delete_reset_token(token.id).await {
            warn!("Failed to delete undelivered reset token: {}", cleanup);
        }
        return Ok(error_response(&e));
    }

    info!("Password reset token issued for {} {}", account_type, account_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Password reset instructions sent",
    )))
}

pub async fn handle_reset_password(
    service: &AuthService,
    reset_request: ResetPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_reset_token(&reset_request.token).await {
        Ok(Some(token)) if token.is_usable(chrono::Utc::now()) => {}
        Ok(_) => return Ok(invalid_token()),
        Err(e) => return Ok(error_response(&e)),
    }

    if let Err(msg) = validate_password(&reset_request.new_password) {
        return Ok(validation_response(msg));
    }

    let password_hash = match hash_password(&reset_request.new_password) {
        Ok(hash) => hash,
        Err(e) => return Ok(error_response(&e)),
    };

    match storage
        .consume_reset_token(&reset_request.token, &password_hash)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Password reset successfully",
        ))),
        // 并发使用同一令牌时，后到的请求在事务内被拒绝
        Err(crate::errors::TkseError::Validation(_)) => Ok(invalid_token()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn handle_validate_token(
    service: &AuthService,
    token: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let response = match storage.get_reset_token(&token).await {
        Ok(Some(t)) if t.is_usable(chrono::Utc::now()) => ResetTokenValidationResponse {
            valid: true,
            email: Some(t.email),
            account_type: Some(t.account_type),
            expires_at: Some(t.expires_at),
        },
        Ok(_) => ResetTokenValidationResponse {
            valid: false,
            email: None,
            account_type: None,
            expires_at: None,
        },
        Err(e) => return Ok(error_response(&e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Token checked")))
}

fn invalid_token() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::ResetTokenInvalid,
        "Invalid or expired token",
    ))
}
