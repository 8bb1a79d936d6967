use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

use super::entities::TaskSubmission;
use crate::models::common::PaginationInfo;
use crate::models::enterprises::entities::EnterpriseSummary;
use crate::models::projects::entities::{DeliverableDetail, ProjectStatus, Task, TaskStatus};
use crate::models::students::entities::StudentSummary;

// 任务摘要
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct TaskSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
}

impl From<&Task> for TaskSummary {
    fn from(t: &Task) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            description: t.description.clone(),
            status: t.status,
        }
    }
}

// 项目摘要
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub status: ProjectStatus,
}

// 企业审核列表项
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct ReviewSubmissionItem {
    pub submission: TaskSubmission,
    pub student: StudentSummary,
    pub task: TaskSummary,
    pub deliverable: DeliverableDetail,
    pub project: ProjectSummary,
}

// 企业审核列表响应
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionReviewListResponse {
    pub items: Vec<ReviewSubmissionItem>,
    pub pagination: PaginationInfo,
}

// 学生自己的提交
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct StudentSubmissionItem {
    pub submission: TaskSubmission,
    pub task: TaskSummary,
    pub validator: Option<EnterpriseSummary>,
}
