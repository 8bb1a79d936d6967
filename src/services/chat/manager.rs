//! 聊天与在线状态连接管理
//!
//! 频道键到连接列表的映射。每个连接持有一个 `mpsc` 发送端，
//! 会话任务负责把收到的文本写入 WebSocket。

use dashmap::DashMap;
use std::collections::HashSet;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::chat::entities::OutboundChatMessage;

pub type ConnectionId = Uuid;

/// 频道内的一个连接
#[derive(Debug, Clone)]
pub struct ChatPeer {
    pub connection_id: ConnectionId,
    pub user_id: String,
    sender: mpsc::UnboundedSender<String>,
}

/// 在线状态频道键
pub fn presence_channel(user_id: &str) -> String {
    format!("presence-{user_id}")
}

#[derive(Default)]
pub struct ChatManager {
    channels: DashMap<String, Vec<ChatPeer>>,
}

impl ChatManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册连接，频道不存在时创建
    pub fn connect(
        &self,
        channel_key: &str,
        user_id: &str,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let connection_id = Uuid::new_v4();
        self.channels
            .entry(channel_key.to_string())
            .or_default()
            .push(ChatPeer {
                connection_id,
                user_id: user_id.to_string(),
                sender,
            });
        debug!(
            "Connection {} for user {} joined channel {}",
            connection_id, user_id, channel_key
        );
        (connection_id, receiver)
    }

    /// 移除连接；频道为空时一并移除
    pub fn disconnect(&self, channel_key: &str, connection_id: ConnectionId) {
        if let Some(mut peers) = self.channels.get_mut(channel_key) {
            peers.retain(|p| p.connection_id != connection_id);
        }
        self.channels
            .remove_if(channel_key, |_, peers| peers.is_empty());
        debug!("Connection {} left channel {}", connection_id, channel_key);
    }

    /// 向频道内所有连接推送消息，返回成功投递数
    pub fn send_channel_message(&self, message: &OutboundChatMessage, channel_key: &str) -> usize {
        let payload = match serde_json::to_string(message) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize chat message: {}", e);
                return 0;
            }
        };
        self.send_text(channel_key, &payload)
    }

    fn send_text(&self, channel_key: &str, payload: &str) -> usize {
        let Some(peers) = self.channels.get(channel_key) else {
            return 0;
        };
        let mut delivered = 0;
        for peer in peers.iter() {
            match peer.sender.send(payload.to_string()) {
                Ok(()) => delivered += 1,
                Err(_) => warn!(
                    "Skipping closed connection {} in channel {}",
                    peer.connection_id, channel_key
                ),
            }
        }
        delivered
    }

    /// 向所有频道的所有连接推送文本
    pub fn broadcast(&self, text: &str) -> usize {
        let keys: Vec<String> = self.channels.iter().map(|e| e.key().clone()).collect();
        keys.iter().map(|key| self.send_text(key, text)).sum()
    }

    pub fn is_user_online(&self, user_id: &str) -> bool {
        self.channels
            .iter()
            .any(|entry| entry.value().iter().any(|p| p.user_id == user_id))
    }

    /// 在线用户数（按用户去重）
    pub fn online_count(&self) -> usize {
        let mut users = HashSet::new();
        for entry in self.channels.iter() {
            for peer in entry.value() {
                users.insert(peer.user_id.clone());
            }
        }
        users.len()
    }

    pub fn channel_exists(&self, channel_key: &str) -> bool {
        self.channels.contains_key(channel_key)
    }

    /// 关闭全部连接，会话任务在发送端全部释放后结束
    pub fn shutdown_all(&self) -> usize {
        let count: usize = self.channels.iter().map(|e| e.value().len()).sum();
        self.channels.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(content: &str) -> OutboundChatMessage {
        OutboundChatMessage {
            from_id: "a".to_string(),
            to_id: "b".to_string(),
            content: content.to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_connect_and_disconnect() {
        let manager = ChatManager::new();
        let (conn, _rx) = manager.connect("room", "alice");
        assert!(manager.channel_exists("room"));
        assert!(manager.is_user_online("alice"));

        manager.disconnect("room", conn);
        assert!(!manager.channel_exists("room"));
        assert!(!manager.is_user_online("alice"));
    }

    #[test]
    fn test_channel_kept_while_peers_remain() {
        let manager = ChatManager::new();
        let (first, _rx1) = manager.connect("room", "alice");
        let (_second, _rx2) = manager.connect("room", "bob");

        manager.disconnect("room", first);
        assert!(manager.channel_exists("room"));
        assert!(!manager.is_user_online("alice"));
        assert!(manager.is_user_online("bob"));
    }

    #[tokio::test]
    async fn test_send_skips_dead_peer() {
        let manager = ChatManager::new();
        let (_a, mut rx_a) = manager.connect("room", "alice");
        let (_b, rx_b) = manager.connect("room", "bob");
        let (_c, mut rx_c) = manager.connect("room", "carol");
        drop(rx_b);

        let delivered = manager.send_channel_message(&message("hello"), "room");
        assert_eq!(delivered, 2);

        let received = rx_a.recv().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&received).unwrap();
        assert_eq!(value["content"], "hello");
        assert_eq!(value["from_id"], "a");
        assert!(rx_c.recv().await.is_some());
    }

    #[test]
    fn test_send_to_missing_channel() {
        let manager = ChatManager::new();
        assert_eq!(manager.send_channel_message(&message("x"), "nobody"), 0);
    }

    #[test]
    fn test_online_count_and_broadcast() {
        let manager = ChatManager::new();
        let (_1, _rx1) = manager.connect("room", "alice");
        let (_2, _rx2) = manager.connect(&presence_channel("alice"), "alice");
        let (_3, _rx3) = manager.connect("other", "bob");

        assert_eq!(manager.online_count(), 2);
        assert_eq!(manager.broadcast("ping"), 3);
    }

    #[tokio::test]
    async fn test_shutdown_closes_receivers() {
        let manager = ChatManager::new();
        let (_conn, mut rx) = manager.connect("room", "alice");
        assert_eq!(manager.shutdown_all(), 1);
        assert!(rx.recv().await.is_none());
        assert_eq!(manager.online_count(), 0);
    }
}
