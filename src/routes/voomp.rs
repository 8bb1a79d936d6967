use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RateLimit;
use crate::models::voomp::VoompWebhookPayload;
use crate::services::VoompService;

// 懒加载的全局 VoompService 实例
static VOOMP_SERVICE: Lazy<VoompService> = Lazy::new(VoompService::new_lazy);

// 支付平台回调，不走 JWT
pub async fn voomp_webhook(
    req: HttpRequest,
    body: web::Json<VoompWebhookPayload>,
) -> ActixResult<HttpResponse> {
    VOOMP_SERVICE.handle_webhook(&req, body.into_inner()).await
}

// 配置路由
pub fn configure_voomp_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/voomp").service(
            web::resource("/webhook")
                .route(web::post().to(voomp_webhook))
                .wrap(RateLimit::api()),
        ),
    );
}
