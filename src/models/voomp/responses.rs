use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/voomp.ts")]
pub enum VoompWebhookOutcome {
    /// 非付款确认事件
    Ignored,
    /// 邮箱已对应一个学生账号
    Existing,
    Created,
}

// 回调处理结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/voomp.ts")]
pub struct VoompWebhookResponse {
    pub outcome: VoompWebhookOutcome,
    pub student_id: Option<Uuid>,
    /// 欢迎邮件是否投递成功；失败时学生可通过找回密码设置密码
    pub welcome_sent: bool,
}
