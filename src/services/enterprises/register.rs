use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EnterpriseService;
use crate::models::ApiResponse;
use crate::models::enterprises::requests::CreateEnterpriseRequest;
use crate::services::{error_response, normalize_email, validation_response};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_name, validate_password};

pub async fn register_enterprise(
    service: &EnterpriseService,
    request: &HttpRequest,
    mut req: CreateEnterpriseRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name(&req.name) {
        return Ok(validation_response(msg));
    }
    if let Err(msg) = validate_email(&req.email) {
        return Ok(validation_response(msg));
    }
    if let Err(msg) = validate_password(&req.password) {
        return Ok(validation_response(msg));
    }

    req.name = req.name.trim().to_string();
    req.email = normalize_email(&req.email);
    req.cnpj = req
        .cnpj
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    req.password = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(error_response(&e)),
    };

    let storage = service.get_storage(request);
    match storage.create_enterprise(req).await {
        Ok(enterprise) => {
            info!("Enterprise {} registered ({})", enterprise.name, enterprise.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                enterprise,
                "Enterprise registered successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
