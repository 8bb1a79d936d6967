use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CountryService;
use crate::models::ApiResponse;
use crate::models::countries::requests::CreateCountryRequest;
use crate::services::{error_response, validation_response};
use crate::utils::validate::{validate_country_code, validate_name};

pub async fn create_country(
    service: &CountryService,
    request: &HttpRequest,
    mut req: CreateCountryRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name(&req.name) {
        return Ok(validation_response(msg));
    }
    req.name = req.name.trim().to_string();

    if let Some(code) = req.code.as_deref() {
        if let Err(msg) = validate_country_code(code.trim()) {
            return Ok(validation_response(msg));
        }
        req.code = Some(code.trim().to_uppercase());
    }

    let storage = service.get_storage(request);
    match storage.create_country(req).await {
        Ok(country) => {
            info!("Country {} created", country.name);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(country, "Country created successfully")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
