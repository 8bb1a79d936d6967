use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{AccountType, LoginRequest, LoginResponse},
};
use crate::services::{error_response, normalize_email};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

pub async fn handle_login(
    service: &AuthService,
    account_type: AccountType,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let email = normalize_email(&login_request.email);

    // 按账号类型查找并校验密码
    match account_type {
        AccountType::Enterprise => match storage.get_enterprise_by_email(&email).await {
            Ok(Some(enterprise))
                if verify_password(&login_request.password, &enterprise.password_hash) =>
            {
                Ok(issue_token(enterprise.id, account_type, enterprise))
            }
            Ok(_) => Ok(login_failed(&email)),
            Err(e) => Ok(error_response(&e)),
        },
        AccountType::Student => match storage.get_student_by_email(&email).await {
            Ok(Some(student)) if verify_password(&login_request.password, &student.password_hash) => {
                Ok(issue_token(student.id, account_type, student))
            }
            Ok(_) => Ok(login_failed(&email)),
            Err(e) => Ok(error_response(&e)),
        },
    }
}

fn issue_token<A: Serialize + TS>(
    account_id: Uuid,
    account_type: AccountType,
    account: A,
) -> HttpResponse {
    match JwtUtils::generate_access_token(account_id, account_type) {
        Ok(access_token) => {
            tracing::info!("{} {} logged in successfully", account_type, account_id);
            let response = LoginResponse {
                access_token,
                expires_in: JwtUtils::access_token_expiry_secs(),
                account,
                created_at: chrono::Utc::now(),
            };
            HttpResponse::Ok().json(ApiResponse::success(response, "Login successful"))
        }
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Login failed, unable to generate token",
            ))
        }
    }
}

fn login_failed(email: &str) -> HttpResponse {
    tracing::info!("Login failed for {}", email);
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Invalid email or password",
    ))
}
