use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::auth::{reset_password, student_forgot_password, student_login};
use crate::middlewares::{RateLimit, RequireAccountType, RequireJWT};
use crate::models::students::requests::{
    CreateStudentRequest, StudentListQuery, UpdateStudentRequest,
};
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::services::StudentService;
use crate::utils::{SafeProjectId, SafeStudentId};

// 懒加载的全局 StudentService 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

// 注册学生
pub async fn register_student(
    req: HttpRequest,
    body: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.register(&req, body.into_inner()).await
}

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(&req, query.into_inner()).await
}

pub async fn list_visible_projects(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_visible_projects(&req).await
}

pub async fn get_student(req: HttpRequest, path: SafeStudentId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(&req, path.0).await
}

pub async fn update_student(
    req: HttpRequest,
    path: SafeStudentId,
    body: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_student(req: HttpRequest, path: SafeStudentId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(&req, path.0).await
}

pub async fn dismiss_welcome(req: HttpRequest, path: SafeStudentId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.dismiss_welcome(&req, path.0).await
}

// 已加入的项目
pub async fn list_student_projects(
    req: HttpRequest,
    path: SafeStudentId,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_student_projects(&req, path.0).await
}

// 加入项目
pub async fn join_project(
    req: HttpRequest,
    student: SafeStudentId,
    project: SafeProjectId,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .join_project(&req, student.0, project.0)
        .await
}

pub async fn list_deliverables(req: HttpRequest, path: SafeStudentId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_deliverables(&req, path.0).await
}

pub async fn get_dashboard(req: HttpRequest, path: SafeStudentId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_dashboard(&req, path.0).await
}

// 提交任务
pub async fn create_submission(
    req: HttpRequest,
    path: SafeStudentId,
    body: web::Json<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_submission(&req, path.0, body.into_inner())
        .await
}

pub async fn list_submissions(req: HttpRequest, path: SafeStudentId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_submissions(&req, path.0).await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .service(
                web::resource("")
                    // 注册 - 公开
                    .route(
                        web::post()
                            .to(register_student)
                            .wrap(RateLimit::register()),
                    )
                    // 列表 - 所有登录账号
                    .route(web::get().to(list_students).wrap(RequireJWT)),
            )
            .service(
                web::resource("/login")
                    .route(web::post().to(student_login))
                    .wrap(RateLimit::login()),
            )
            .service(
                web::resource("/forgot-password")
                    .route(web::post().to(student_forgot_password))
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
                    .service(
                        web::resource("/visible-projects")
                            .route(web::get().to(list_visible_projects)),
                    )
                    .service(
                        web::resource("/{student_id}")
                            .route(web::get().to(get_student))
                            // 修改、删除 - 仅本人（业务层校验）
                            .route(web::put().to(update_student))
                            .route(web::delete().to(delete_student)),
                    )
                    .service(
                        web::resource("/{student_id}/dismiss-welcome")
                            .route(web::patch().to(dismiss_welcome)),
                    )
                    .service(
                        web::resource("/{student_id}/projects")
                            .route(web::get().to(list_student_projects)),
                    )
                    .service(
                        web::resource("/{student_id}/projects/{project_id}")
                            .route(web::post().to(join_project))
                            .wrap(RequireAccountType::student()),
                    )
                    .service(
                        web::resource("/{student_id}/deliverables")
                            .route(web::get().to(list_deliverables)),
                    )
                    .service(
                        web::resource("/{student_id}/dashboard")
                            .route(web::get().to(get_dashboard)),
                    )
                    .service(
                        web::resource("/{student_id}/submissions")
                            .route(web::get().to(list_submissions))
                            .route(
                                web::post()
                                    .to(create_submission)
                                    .wrap(RequireAccountType::student()),
                            ),
                    ),
            ),
    );
}
