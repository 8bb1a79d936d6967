use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::ChatService;

// 懒加载的全局 ChatService 实例
static CHAT_SERVICE: Lazy<ChatService> = Lazy::new(ChatService::new_lazy);

// 聊天 WebSocket
pub async fn chat_ws(
    req: HttpRequest,
    body: web::Payload,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (channel_id, user_id) = path.into_inner();
    CHAT_SERVICE.open_chat(&req, body, channel_id, user_id).await
}

// 在线状态 WebSocket
pub async fn presence_ws(
    req: HttpRequest,
    body: web::Payload,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    CHAT_SERVICE
        .open_presence(&req, body, path.into_inner())
        .await
}

pub async fn chat_history(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (user1, user2) = path.into_inner();
    CHAT_SERVICE.history(&req, user1, user2).await
}

pub async fn user_status(req: HttpRequest, path: web::Path<String>) -> ActixResult<HttpResponse> {
    CHAT_SERVICE.user_status(&req, path.into_inner()).await
}

// 配置路由
// TODO: 会话握手尚未携带令牌，接入前端鉴权后再加 RequireJWT
pub fn configure_chat_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/chat")
            .route("/ws/presence-{user_id}", web::get().to(presence_ws))
            .route("/ws/{channel_id}/{user_id}", web::get().to(chat_ws))
            .route("/history/{user1}/{user2}", web::get().to(chat_history))
            .route("/status/{user_id}", web::get().to(user_status)),
    );
}
