use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::models::auth::AccountType;

// 密码重置令牌
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct PasswordResetToken {
    pub id: Uuid,
    pub token: String,
    pub email: String,
    pub account_type: AccountType,
    pub account_id: Uuid,
    pub is_used: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl PasswordResetToken {
    /// 未使用且未过期
    pub fn is_usable(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        !self.is_used && self.expires_at > now
    }
}
