use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::auth::{enterprise_forgot_password, enterprise_login, reset_password};
use crate::middlewares::{RateLimit, RequireAccountType, RequireJWT};
use crate::models::enterprises::requests::{CreateEnterpriseRequest, UpdateEnterpriseRequest};
use crate::models::submissions::requests::{SubmissionReviewQuery, ValidateSubmissionRequest};
use crate::services::EnterpriseService;
use crate::utils::{SafeEnterpriseId, SafeStudentId, SafeSubmissionId};

// 懒加载的全局 EnterpriseService 实例
static ENTERPRISE_SERVICE: Lazy<EnterpriseService> = Lazy::new(EnterpriseService::new_lazy);

// 注册企业
pub async fn register_enterprise(
    req: HttpRequest,
    body: web::Json<CreateEnterpriseRequest>,
) -> ActixResult<HttpResponse> {
    ENTERPRISE_SERVICE.register(&req, body.into_inner()).await
}

pub async fn get_enterprise(req: HttpRequest, path: SafeEnterpriseId) -> ActixResult<HttpResponse> {
    ENTERPRISE_SERVICE.get_enterprise(&req, path.0).await
}

pub async fn update_enterprise(
    req: HttpRequest,
    path: SafeEnterpriseId,
    body: web::Json<UpdateEnterpriseRequest>,
) -> ActixResult<HttpResponse> {
    ENTERPRISE_SERVICE
        .update_enterprise(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_enterprise(
    req: HttpRequest,
    path: SafeEnterpriseId,
) -> ActixResult<HttpResponse> {
    ENTERPRISE_SERVICE.delete_enterprise(&req, path.0).await
}

// 企业的项目列表
pub async fn list_enterprise_projects(
    req: HttpRequest,
    path: SafeEnterpriseId,
) -> ActixResult<HttpResponse> {
    ENTERPRISE_SERVICE
        .list_enterprise_projects(&req, path.0)
        .await
}

// 学生合作过的企业
pub async fn list_enterprises_by_student(
    req: HttpRequest,
    path: SafeStudentId,
) -> ActixResult<HttpResponse> {
    ENTERPRISE_SERVICE
        .list_enterprises_by_student(&req, path.0)
        .await
}

// 待审核提交
pub async fn list_submissions_to_validate(
    req: HttpRequest,
    query: web::Query<SubmissionReviewQuery>,
) -> ActixResult<HttpResponse> {
    ENTERPRISE_SERVICE
        .list_submissions_to_validate(&req, query.into_inner())
        .await
}

// 审核提交
pub async fn validate_submission(
    req: HttpRequest,
    path: SafeSubmissionId,
    body: web::Json<ValidateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    ENTERPRISE_SERVICE
        .validate_submission(&req, path.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_enterprise_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enterprises")
            .service(
                web::resource("")
                    .route(web::post().to(register_enterprise))
                    .wrap(RateLimit::register()),
            )
            .service(
                web::resource("/login")
                    .route(web::post().to(enterprise_login))
                    .wrap(RateLimit::login()),
            )
            .service(
                web::resource("/forgot-password")
                    .route(web::post().to(enterprise_forgot_password))
                    .wrap(RateLimit::forgot_password()),
            )
            .service(
                web::resource("/reset-password")
                    .route(web::post().to(reset_password))
                    .wrap(RateLimit::forgot_password()),
            )
            .service(
                web::scope("")
                    .wrap(RequireJWT)
                    // 审核相关 - 仅企业
                    .service(
                        web::resource("/submissions-to-validate")
                            .route(web::get().to(list_submissions_to_validate))
                            .wrap(RequireAccountType::enterprise()),
                    )
                    .service(
                        web::resource("/submissions/{submission_id}/validate")
                            .route(web::post().to(validate_submission))
                            .wrap(RequireAccountType::enterprise()),
                    )
                    .service(
                        web::resource("/{enterprise_id}")
                            // 查看资料 - 所有登录账号
                            .route(web::get().to(get_enterprise))
                            // 修改、删除 - 仅本企业（业务层校验）
                            .route(web::put().to(update_enterprise))
                            .route(web::delete().to(delete_enterprise)),
                    )
                    .service(
                        web::resource("/{enterprise_id}/projects")
                            .route(web::get().to(list_enterprise_projects)),
                    )
                    // 企业或学生本人（业务层校验）
                    .service(
                        web::resource("/{student_id}/enterprises")
                            .route(web::get().to(list_enterprises_by_student)),
                    ),
            ),
    );
}
