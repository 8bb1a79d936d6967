use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DashboardService;
use crate::models::ApiResponse;
use crate::services::{current_account, error_response};

pub async fn get_enterprise_summary(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let account = match current_account(request) {
        Ok(account) => account,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match storage.enterprise_dashboard_summary(account.id).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            summary,
            "Dashboard summary retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
