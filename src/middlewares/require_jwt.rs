/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>`，加载对应的企业或学生账号，
 * 并把 [`AuthAccount`] 写入请求扩展，供后续处理程序读取。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::RequireJWT;
 *
 * web::scope("/api/v1/projects")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_projects));
 *
 * async fn handler(req: HttpRequest) -> Result<HttpResponse> {
 *     if let Some(account) = RequireJWT::extract_account(&req) {
 *         // account.id / account.account_type
 *     }
 *     ...
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 提取并验证 access token（签名、过期时间、token_type）
 * 2. 先查缓存 `account:<token>`，未命中再按 account_type 查存储
 * 3. 已软删除的账号在存储层查不到，直接返回 401
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::auth::{AccountType, AuthAccount};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};
use uuid::Uuid;

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

/// 账号缓存键
pub fn account_cache_key(token: &str) -> String {
    format!("account:{token}")
}

/// 从请求头提取 Bearer token
pub fn bearer_token(req: &actix_web::HttpRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::to_string)
}

// 按账号类型从存储加载活跃账号
async fn load_account(
    storage: &Arc<dyn Storage>,
    account_type: AccountType,
    id: Uuid,
) -> Result<Option<AuthAccount>, String> {
    let account = match account_type {
        AccountType::Enterprise => storage
            .get_enterprise_by_id(id)
            .await
            .map_err(|e| format!("Failed to retrieve account from storage: {e}"))?
            .map(|e| AuthAccount {
                id: e.id,
                account_type,
                name: e.name,
                email: e.email,
            }),
        AccountType::Student => storage
            .get_student_by_id(id)
            .await
            .map_err(|e| format!("Failed to retrieve account from storage: {e}"))?
            .map(|s| AuthAccount {
                id: s.id,
                account_type,
                name: s.name,
                email: s.email,
            }),
    };
    Ok(account)
}

// 提取并验证 JWT access token
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<AuthAccount, String> {
    let token = bearer_token(req.request())
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = JwtUtils::verify_access_token(&token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let cache = req
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone();

    let cache_key = account_cache_key(&token);
    match cache.get_json::<AuthAccount>(&cache_key).await {
        CacheResult::Found(account) => return Ok(account),
        _ => debug!("Account not cached for subject {}", claims.sub),
    }

    let account_id = claims
        .account_id()
        .ok_or_else(|| "Invalid account ID in JWT".to_string())?;

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone();

    let account = load_account(&storage, claims.account_type, account_id)
        .await?
        .ok_or_else(|| "Account not found or inactive".to_string())?;

    cache
        .insert_json(cache_key, &account, AppConfig::get().cache.default_ttl)
        .await;

    Ok(account)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(account) => {
                    debug!(
                        "JWT authentication successful for {} {}",
                        account.account_type, account.id
                    );
                    req.extensions_mut().insert(account);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中提取已认证账号
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_account(req: &actix_web::HttpRequest) -> Option<AuthAccount> {
        req.extensions().get::<AuthAccount>().cloned()
    }

    pub fn extract_account_id(req: &actix_web::HttpRequest) -> Option<Uuid> {
        req.extensions().get::<AuthAccount>().map(|a| a.id)
    }

    pub fn extract_account_type(req: &actix_web::HttpRequest) -> Option<AccountType> {
        req.extensions()
            .get::<AuthAccount>()
            .map(|a| a.account_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_extraction() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc.def.ghi"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic xyz"))
            .to_http_request();
        assert!(bearer_token(&req).is_none());
    }
}
