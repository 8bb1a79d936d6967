use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::countries::requests::{CreateCountryRequest, UpdateCountryRequest};
use crate::services::CountryService;
use crate::utils::SafeCountryId;

static COUNTRY_SERVICE: Lazy<CountryService> = Lazy::new(CountryService::new_lazy);

pub async fn list_countries(req: HttpRequest) -> ActixResult<HttpResponse> {
    COUNTRY_SERVICE.list_countries(&req).await
}

pub async fn create_country(
    req: HttpRequest,
    body: web::Json<CreateCountryRequest>,
) -> ActixResult<HttpResponse> {
    COUNTRY_SERVICE.create_country(&req, body.into_inner()).await
}

pub async fn get_country(req: HttpRequest, path: SafeCountryId) -> ActixResult<HttpResponse> {
    COUNTRY_SERVICE.get_country(&req, path.0).await
}

pub async fn update_country(
    req: HttpRequest,
    path: SafeCountryId,
    body: web::Json<UpdateCountryRequest>,
) -> ActixResult<HttpResponse> {
    COUNTRY_SERVICE
        .update_country(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_country(req: HttpRequest, path: SafeCountryId) -> ActixResult<HttpResponse> {
    COUNTRY_SERVICE.delete_country(&req, path.0).await
}

// 配置路由：查询公开（注册页需要国家列表），写操作需要登录
pub fn configure_country_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/countries")
            .service(
                web::resource("")
                    .route(web::get().to(list_countries))
                    .route(web::post().to(create_country).wrap(RequireJWT)),
            )
            .service(
                web::resource("/{country_id}")
                    .route(web::get().to(get_country))
                    .route(web::put().to(update_country).wrap(RequireJWT))
                    .route(web::delete().to(delete_country).wrap(RequireJWT)),
            ),
    );
}
