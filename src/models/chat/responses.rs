use serde::Serialize;
use ts_rs::TS;

// 在线状态
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct UserStatusResponse {
    pub user_id: String,
    /// online 或 offline
    pub status: String,
}

impl UserStatusResponse {
    pub fn new(user_id: String, online: bool) -> Self {
        Self {
            user_id,
            status: if online { "online" } else { "offline" }.to_string(),
        }
    }
}
