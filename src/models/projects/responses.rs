use serde::Serialize;
use ts_rs::TS;

use super::entities::ProjectDetail;
use crate::models::common::PaginationInfo;

// 项目列表响应
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct ProjectListResponse {
    pub items: Vec<ProjectDetail>,
    pub pagination: PaginationInfo,
}

// 学生已加入的项目
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct StudentProjectItem {
    pub project: ProjectDetail,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}
