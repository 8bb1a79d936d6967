use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RateLimit;
use crate::models::auth::{
    AccountType, LoginRequest,
    requests::{ForgotPasswordRequest, ResetPasswordRequest, ValidateResetTokenQuery},
};
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn enterprise_login(
    req: HttpRequest,
    body: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .login(AccountType::Enterprise, body.into_inner(), &req)
        .await
}

pub async fn student_login(
    req: HttpRequest,
    body: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .login(AccountType::Student, body.into_inner(), &req)
        .await
}

pub async fn enterprise_forgot_password(
    req: HttpRequest,
    body: web::Json<ForgotPasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .forgot_password(AccountType::Enterprise, body.into_inner(), &req)
        .await
}

pub async fn student_forgot_password(
    req: HttpRequest,
    body: web::Json<ForgotPasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .forgot_password(AccountType::Student, body.into_inner(), &req)
        .await
}

// 令牌本身记录了账号类型，企业与学生共用
pub async fn reset_password(
    req: HttpRequest,
    body: web::Json<ResetPasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.reset_password(body.into_inner(), &req).await
}

pub async fn validate_reset_token(
    req: HttpRequest,
    query: web::Query<ValidateResetTokenQuery>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .validate_reset_token(query.into_inner().token, &req)
        .await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .route(
                "/reset-password/validate",
                web::get().to(validate_reset_token),
            )
            .service(
                web::resource("/reset-password")
                    .route(web::post().to(reset_password))
                    .wrap(RateLimit::forgot_password()),
            ),
    );
}
