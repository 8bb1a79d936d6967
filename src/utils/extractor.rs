//! 安全的路径参数提取器
//!
//! 路径中的 ID 不是合法 UUID 时直接返回 400 与统一响应体，而不是 actix 默认的 404。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::models::{ApiResponse, ErrorCode};

fn invalid_param(name: &str) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::InvalidArgument,
        format!("Invalid path parameter: {name}"),
    ));
    InternalError::from_response(format!("invalid {name}"), response).into()
}

fn extract_uuid(req: &HttpRequest, name: &str) -> Result<Uuid, actix_web::Error> {
    req.match_info()
        .get(name)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or_else(|| invalid_param(name))
}

macro_rules! define_safe_uuid_extractor {
    ($($name:ident => $param:literal),+ $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub Uuid);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(extract_uuid(req, $param).map($name))
                }
            }
        )+
    };
}

define_safe_uuid_extractor! {
    SafeEnterpriseId => "enterprise_id",
    SafeStudentId => "student_id",
    SafeProjectId => "project_id",
    SafeSubmissionId => "submission_id",
    SafeCountryId => "country_id",
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_extracts_valid_uuid() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .param("project_id", id.to_string())
            .to_http_request();
        let extracted = SafeProjectId::extract(&req).await.unwrap();
        assert_eq!(extracted.0, id);
    }

    #[actix_web::test]
    async fn test_rejects_malformed_uuid() {
        let req = TestRequest::default()
            .param("student_id", "42")
            .to_http_request();
        let err = SafeStudentId::extract(&req).await.unwrap_err();
        assert_eq!(
            err.as_response_error().status_code(),
            actix_web::http::StatusCode::BAD_REQUEST
        );
    }
}
