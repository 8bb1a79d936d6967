use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireAccountType, RequireJWT};
use crate::models::projects::requests::{
    ProjectListQuery, PublishProjectRequest, UpdateProjectRequest, UpdateProjectStatusRequest,
};
use crate::services::ProjectService;
use crate::utils::SafeProjectId;

// 懒加载的全局 ProjectService 实例
static PROJECT_SERVICE: Lazy<ProjectService> = Lazy::new(ProjectService::new_lazy);

// 列出项目
pub async fn list_projects(
    req: HttpRequest,
    query: web::Query<ProjectListQuery>,
) -> ActixResult<HttpResponse> {
    PROJECT_SERVICE.list_projects(&req, query.into_inner()).await
}

// 发布项目
pub async fn publish_project(
    req: HttpRequest,
    body: web::Json<PublishProjectRequest>,
) -> ActixResult<HttpResponse> {
    PROJECT_SERVICE
        .publish_project(&req, body.into_inner())
        .await
}

pub async fn get_project(req: HttpRequest, path: SafeProjectId) -> ActixResult<HttpResponse> {
    PROJECT_SERVICE.get_project(&req, path.0).await
}

pub async fn update_project(
    req: HttpRequest,
    path: SafeProjectId,
    body: web::Json<UpdateProjectRequest>,
) -> ActixResult<HttpResponse> {
    PROJECT_SERVICE
        .update_project(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_project(req: HttpRequest, path: SafeProjectId) -> ActixResult<HttpResponse> {
    PROJECT_SERVICE.delete_project(&req, path.0).await
}

// 项目状态流转
pub async fn update_project_status(
    req: HttpRequest,
    path: SafeProjectId,
    body: web::Json<UpdateProjectStatusRequest>,
) -> ActixResult<HttpResponse> {
    PROJECT_SERVICE
        .update_project_status(&req, path.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_project_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/projects")
            .wrap(RequireJWT)
            // 列表 - 所有登录账号
            .service(web::resource("").route(web::get().to(list_projects)))
            // 发布 - 仅企业
            .service(
                web::resource("/publish")
                    .route(web::post().to(publish_project))
                    .wrap(RequireAccountType::enterprise()),
            )
            .service(
                web::resource("/{project_id}")
                    .route(web::get().to(get_project))
                    // 修改、删除 - 仅所属企业（业务层校验归属）
                    .route(
                        web::put()
                            .to(update_project)
                            .wrap(RequireAccountType::enterprise()),
                    )
                    .route(
                        web::delete()
                            .to(delete_project)
                            .wrap(RequireAccountType::enterprise()),
                    ),
            )
            .service(
                web::resource("/{project_id}/status")
                    .route(web::patch().to(update_project_status))
                    .wrap(RequireAccountType::enterprise()),
            ),
    );
}
