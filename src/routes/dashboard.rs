use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireAccountType, RequireJWT};
use crate::models::dashboard::requests::DeliveriesQuery;
use crate::services::DashboardService;

static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

// 企业概览
pub async fn get_summary(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.get_summary(&req).await
}

// 按月交付趋势
pub async fn get_deliveries_per_project(
    req: HttpRequest,
    query: web::Query<DeliveriesQuery>,
) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE
        .get_deliveries_per_project(&req, query.into_inner())
        .await
}

pub fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/dashboard")
            .wrap(RequireAccountType::enterprise())
            .wrap(RequireJWT)
            .route("/summary", web::get().to(get_summary))
            .route(
                "/deliveries-per-project",
                web::get().to(get_deliveries_per_project),
            ),
    );
}
