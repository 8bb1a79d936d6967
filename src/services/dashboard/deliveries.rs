use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Datelike;
use uuid::Uuid;

use super::DashboardService;
use crate::models::ApiResponse;
use crate::models::dashboard::requests::DeliveriesQuery;
use crate::services::{current_account, error_response, validation_response};

/// 解析逗号分隔的项目 ID，空串视为不过滤
pub fn parse_project_ids(raw: Option<&str>) -> Result<Option<Vec<Uuid>>, String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Uuid::parse_str(s).map_err(|_| format!("Invalid project id: {s}")))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

pub async fn get_deliveries_per_project(
    service: &DashboardService,
    request: &HttpRequest,
    query: DeliveriesQuery,
) -> ActixResult<HttpResponse> {
    let account = match current_account(request) {
        Ok(account) => account,
        Err(resp) => return Ok(resp),
    };

    let project_ids = match parse_project_ids(query.project_ids.as_deref()) {
        Ok(ids) => ids,
        Err(msg) => return Ok(validation_response(msg)),
    };

    let year = chrono::Utc::now().year();
    let storage = service.get_storage(request);
    match storage
        .deliveries_per_project(account.id, project_ids, year)
        .await
    {
        Ok(series) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            series,
            "Deliveries retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_project_ids() {
        assert_eq!(parse_project_ids(None).unwrap(), None);
        assert_eq!(parse_project_ids(Some("  ")).unwrap(), None);

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let raw = format!("{a}, {b},");
        assert_eq!(parse_project_ids(Some(&raw)).unwrap(), Some(vec![a, b]));

        assert!(parse_project_ids(Some("not-a-uuid")).is_err());
    }
}
