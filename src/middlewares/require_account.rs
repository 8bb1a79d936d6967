/*!
 * 账号类型访问控制中间件
 *
 * 必须在 RequireJWT 之后使用，限制路由只允许企业或只允许学生访问。
 *
 * ```rust,ignore
 * web::scope("/api/v1/projects")
 *     .wrap(RequireAccountType::enterprise())
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    auth::{AccountType, AuthAccount},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireAccountType {
    required: AccountType,
}

impl RequireAccountType {
    pub fn new(required: AccountType) -> Self {
        Self { required }
    }

    pub fn enterprise() -> Self {
        Self::new(AccountType::Enterprise)
    }

    pub fn student() -> Self {
        Self::new(AccountType::Student)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAccountType
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAccountTypeMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAccountTypeMiddleware {
            service: Rc::new(service),
            required: self.required,
        }))
    }
}

pub struct RequireAccountTypeMiddleware<S> {
    service: Rc<S>,
    required: AccountType,
}

impl<S, B> Service<ServiceRequest> for RequireAccountTypeMiddleware<S>
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
        let required = self.required;

        Box::pin(async move {
            let account_type = req
                .extensions()
                .get::<AuthAccount>()
                .map(|a| (a.id, a.account_type));

            match account_type {
                Some((_, actual)) if actual == required => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Some((id, actual)) => {
                    info!(
                        "Access denied for {} {}. Required account type: {}",
                        actual, id, required
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            &format!("Access restricted to {required} accounts"),
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!(
                        "Account type check failed: no account in request. Make sure RequireJWT middleware is applied first."
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}
