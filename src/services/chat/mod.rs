pub mod manager;
pub mod session;

pub use manager::{ChatManager, presence_channel};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::models::ApiResponse;
use crate::models::chat::responses::UserStatusResponse;
use crate::services::error_response;
use crate::storage::Storage;
use session::{ChatSession, SessionKind};

pub struct ChatService {
    storage: Option<Arc<dyn Storage>>,
}

impl ChatService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_manager(&self, request: &HttpRequest) -> Arc<ChatManager> {
        request
            .app_data::<web::Data<Arc<ChatManager>>>()
            .expect("ChatManager not found in app data")
            .get_ref()
            .clone()
    }

    fn heartbeat() -> Duration {
        Duration::from_secs(AppConfig::get().chat.heartbeat_interval)
    }

    // 聊天会话
    pub async fn open_chat(
        &self,
        request: &HttpRequest,
        body: web::Payload,
        channel_id: String,
        user_id: String,
    ) -> ActixResult<HttpResponse> {
        let (response, session, stream) = actix_ws::handle(request, body)?;
        let chat = ChatSession {
            manager: self.get_manager(request),
            channel_key: channel_id,
            user_id,
            kind: SessionKind::Chat {
                storage: self.get_storage(request),
            },
            heartbeat: Self::heartbeat(),
        };
        actix_web::rt::spawn(chat.run(session, stream));
        Ok(response)
    }

    // 在线状态会话
    pub async fn open_presence(
        &self,
        request: &HttpRequest,
        body: web::Payload,
        user_id: String,
    ) -> ActixResult<HttpResponse> {
        let (response, session, stream) = actix_ws::handle(request, body)?;
        let presence = ChatSession {
            manager: self.get_manager(request),
            channel_key: presence_channel(&user_id),
            user_id,
            kind: SessionKind::Presence,
            heartbeat: Self::heartbeat(),
        };
        actix_web::rt::spawn(presence.run(session, stream));
        Ok(response)
    }

    // 两个用户之间的聊天记录
    pub async fn history(
        &self,
        request: &HttpRequest,
        user1: String,
        user2: String,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        match storage.chat_history(&user1, &user2).await {
            Ok(messages) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                messages,
                "Chat history retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    // 用户在线状态
    pub async fn user_status(
        &self,
        request: &HttpRequest,
        user_id: String,
    ) -> ActixResult<HttpResponse> {
        let online = self.get_manager(request).is_user_online(&user_id);
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserStatusResponse::new(user_id, online),
            "User status retrieved successfully",
        )))
    }
}
