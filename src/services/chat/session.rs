//! WebSocket 会话循环
//!
//! 每个连接一个任务：同时读取客户端帧、频道推送和心跳定时器。
//! 退出循环前先从 [`ChatManager`] 注销，之后不会再收到新的推送。

use actix_ws::Message;
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::manager::ChatManager;
use crate::models::chat::entities::{InboundChatMessage, OutboundChatMessage};
use crate::storage::Storage;

pub const INVALID_FORMAT_REPLY: &str =
    r#"Invalid format. Send JSON: {"from": "...", "to": "...", "message": "..."}"#;

pub const PERSIST_FAILED_REPLY: &str = "Message could not be saved, please try again";

/// 入站文本帧的处理结果
#[derive(Debug, PartialEq)]
enum Inbound {
    /// 在线状态会话不处理入站消息
    Ignored,
    /// 只回复发送方
    Reply(&'static str),
    /// 已保存并推送给频道内的连接数
    Delivered(usize),
}

/// 会话类型
pub enum SessionKind {
    /// 聊天：入站消息持久化后广播到频道
    Chat { storage: Arc<dyn Storage> },
    /// 在线状态：忽略入站消息
    Presence,
}

pub struct ChatSession {
    pub manager: Arc<ChatManager>,
    pub channel_key: String,
    pub user_id: String,
    pub kind: SessionKind,
    pub heartbeat: Duration,
}

impl ChatSession {
    pub async fn run(self, mut session: actix_ws::Session, mut stream: actix_ws::MessageStream) {
        let (connection_id, mut rx) = self.manager.connect(&self.channel_key, &self.user_id);
        info!(
            "WebSocket connected: user {} on channel {}",
            self.user_id, self.channel_key
        );

        let mut heartbeat = tokio::time::interval(self.heartbeat);
        // 第一次 tick 立即完成
        heartbeat.tick().await;

        loop {
            tokio::select! {
                msg = stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if !self.handle_text(&mut session, &text).await {
                                break;
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if session.pong(&data).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("WebSocket closed for user {} on {}", self.user_id, self.channel_key);
                            break;
                        }
                        Some(Err(e)) => {
                            warn!("WebSocket error for user {}: {:?}", self.user_id, e);
                            break;
                        }
                        _ => {}
                    }
                }

                outbound = rx.recv() => {
                    match outbound {
                        Some(text) => {
                            if session.text(text).await.is_err() {
                                break;
                            }
                        }
                        // 管理器已关闭全部连接
                        None => break,
                    }
                }

                _ = heartbeat.tick() => {
                    if session.ping(b"").await.is_err() {
                        break;
                    }
                }
            }
        }

        self.manager.disconnect(&self.channel_key, connection_id);
        let _ = session.close(None).await;
        info!(
            "WebSocket disconnected: user {} on channel {}",
            self.user_id, self.channel_key
        );
    }

    /// 处理一条文本帧，返回 false 表示连接已不可用
    async fn handle_text(&self, session: &mut actix_ws::Session, text: &str) -> bool {
        match self.process_text(text).await {
            Inbound::Reply(reply) => session.text(reply).await.is_ok(),
            Inbound::Ignored | Inbound::Delivered(_) => true,
        }
    }

    /// 解析、持久化并广播；需要回复发送方时返回 [`Inbound::Reply`]
    async fn process_text(&self, text: &str) -> Inbound {
        let storage = match &self.kind {
            SessionKind::Presence => {
                debug!("Ignoring presence frame from user {}", self.user_id);
                return Inbound::Ignored;
            }
            SessionKind::Chat { storage } => storage,
        };

        let Ok(inbound) = serde_json::from_str::<InboundChatMessage>(text) else {
            return Inbound::Reply(INVALID_FORMAT_REPLY);
        };

        match storage
            .save_chat_message(&inbound.from, &inbound.to, &inbound.message)
            .await
        {
            Ok(saved) => {
                let delivered = self
                    .manager
                    .send_channel_message(&OutboundChatMessage::from(&saved), &self.channel_key);
                debug!(
                    "Chat message {} delivered to {} connection(s)",
                    saved.id, delivered
                );
                Inbound::Delivered(delivered)
            }
            // 未持久化的消息不广播
            Err(e) => {
                error!(
                    "Failed to persist chat message from {} on {}: {}",
                    inbound.from, self.channel_key, e
                );
                Inbound::Reply(PERSIST_FAILED_REPLY)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::chat::presence_channel;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

    async fn memory_db() -> (DatabaseConnection, Arc<dyn Storage>) {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        let storage = SeaOrmStorage::from_connection(db.clone()).await.unwrap();
        (db, Arc::new(storage))
    }

    fn chat_session(manager: Arc<ChatManager>, storage: Arc<dyn Storage>) -> ChatSession {
        ChatSession {
            manager,
            channel_key: "room-1".to_string(),
            user_id: "u1".to_string(),
            kind: SessionKind::Chat { storage },
            heartbeat: Duration::from_secs(30),
        }
    }

    #[actix_web::test]
    async fn test_malformed_frame_gets_format_reply() {
        let (_db, storage) = memory_db().await;
        let session = chat_session(Arc::new(ChatManager::new()), storage);

        assert_eq!(
            session.process_text("not json").await,
            Inbound::Reply(INVALID_FORMAT_REPLY)
        );
        assert_eq!(
            session.process_text(r#"{"from": "u1", "message": "hi"}"#).await,
            Inbound::Reply(INVALID_FORMAT_REPLY)
        );
    }

    #[actix_web::test]
    async fn test_valid_frame_is_saved_and_broadcast() {
        let (_db, storage) = memory_db().await;
        let manager = Arc::new(ChatManager::new());
        let (_id, mut peer) = manager.connect("room-1", "u2");
        let session = chat_session(manager, storage.clone());

        let outcome = session
            .process_text(r#"{"from": "u1", "to": "u2", "message": "olá"}"#)
            .await;
        assert_eq!(outcome, Inbound::Delivered(1));

        let pushed: serde_json::Value = serde_json::from_str(&peer.try_recv().unwrap()).unwrap();
        assert_eq!(pushed["from_id"], "u1");
        assert_eq!(pushed["content"], "olá");
        assert_eq!(storage.chat_history("u1", "u2").await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_failed_save_replies_and_skips_broadcast() {
        let (db, storage) = memory_db().await;
        db.execute_unprepared("DROP TABLE chat_messages")
            .await
            .unwrap();

        let manager = Arc::new(ChatManager::new());
        let (_id, mut peer) = manager.connect("room-1", "u2");
        let session = chat_session(manager, storage);

        let outcome = session
            .process_text(r#"{"from": "u1", "to": "u2", "message": "hi"}"#)
            .await;
        assert_eq!(outcome, Inbound::Reply(PERSIST_FAILED_REPLY));
        assert!(peer.try_recv().is_err());
    }

    #[actix_web::test]
    async fn test_presence_frames_are_ignored() {
        let session = ChatSession {
            manager: Arc::new(ChatManager::new()),
            channel_key: presence_channel("u1"),
            user_id: "u1".to_string(),
            kind: SessionKind::Presence,
            heartbeat: Duration::from_secs(30),
        };
        assert_eq!(session.process_text("anything").await, Inbound::Ignored);
    }
}
