use serde::Deserialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::models::common::PaginationQuery;

// 创建提交请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct CreateSubmissionRequest {
    pub task_id: Uuid,
    pub submission_link: String,
    pub branch_name: Option<String>,
    pub evidence_file: Option<String>,
}

// 审核提交请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct ValidateSubmissionRequest {
    pub validator_id: Uuid,
    /// APPROVED 或 REJECTED
    pub status: String,
    pub feedback: Option<String>,
}

// 企业待审提交查询
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionReviewQuery {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    /// 按学生名、交付物名、任务名模糊搜索（不区分大小写）
    pub search: Option<String>,
    pub project_id: Option<Uuid>,
    pub status: Option<String>,
}
