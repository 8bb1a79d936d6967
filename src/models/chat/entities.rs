use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// 已持久化的聊天消息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct ChatMessage {
    pub id: Uuid,
    pub from_id: String,
    pub to_id: String,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 客户端发来的文本帧
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct InboundChatMessage {
    pub from: String,
    pub to: String,
    pub message: String,
}

/// 推送给频道内所有连接的消息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct OutboundChatMessage {
    pub from_id: String,
    pub to_id: String,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&ChatMessage> for OutboundChatMessage {
    fn from(m: &ChatMessage) -> Self {
        Self {
            from_id: m.from_id.clone(),
            to_id: m.to_id.clone(),
            content: m.content.clone(),
            created_at: m.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_requires_all_keys() {
        let ok: Result<InboundChatMessage, _> =
            serde_json::from_str(r#"{"from":"a","to":"b","message":"hi"}"#);
        assert!(ok.is_ok());

        let missing: Result<InboundChatMessage, _> =
            serde_json::from_str(r#"{"from":"a","message":"hi"}"#);
        assert!(missing.is_err());
    }
}
