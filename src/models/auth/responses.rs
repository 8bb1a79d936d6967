use serde::Serialize;
use ts_rs::TS;

use super::entities::AccountType;

// 登录响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse<A: TS> {
    pub access_token: String,
    pub expires_in: i64,
    pub account: A,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 重置令牌校验结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct ResetTokenValidationResponse {
    pub valid: bool,
    pub email: Option<String>,
    pub account_type: Option<AccountType>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}
