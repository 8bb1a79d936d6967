use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::CountryService;
use crate::models::countries::requests::UpdateCountryRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, validation_response};
use crate::utils::validate::{validate_country_code, validate_name};

fn country_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::NotFound,
        "Country not found",
    ))
}

pub async fn list_countries(
    service: &CountryService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.list_countries().await {
        Ok(countries) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            countries,
            "Countries retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_country(
    service: &CountryService,
    request: &HttpRequest,
    country_id: Uuid,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.get_country_by_id(country_id).await {
        Ok(Some(country)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            country,
            "Country retrieved successfully",
        ))),
        Ok(None) => Ok(country_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_country(
    service: &CountryService,
    request: &HttpRequest,
    country_id: Uuid,
    mut req: UpdateCountryRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = req.name.as_deref() {
        if let Err(msg) = validate_name(name) {
            return Ok(validation_response(msg));
        }
        req.name = Some(name.trim().to_string());
    }
    if let Some(code) = req.code.as_deref() {
        if let Err(msg) = validate_country_code(code.trim()) {
            return Ok(validation_response(msg));
        }
        req.code = Some(code.trim().to_uppercase());
    }

    let storage = service.get_storage(request);
    match storage.update_country(country_id, req).await {
        Ok(Some(country)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            country,
            "Country updated successfully",
        ))),
        Ok(None) => Ok(country_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_country(
    service: &CountryService,
    request: &HttpRequest,
    country_id: Uuid,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.delete_country(country_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Country deleted successfully",
        ))),
        Ok(false) => Ok(country_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}
