use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::models::projects::entities::TaskStatus;

// 提交状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    Pending,  // 待审核
    Approved, // 已通过
    Rejected, // 已驳回
}

impl SubmissionStatus {
    pub const PENDING: &'static str = "PENDING";
    pub const APPROVED: &'static str = "APPROVED";
    pub const REJECTED: &'static str = "REJECTED";

    /// 审核结论只能是通过或驳回
    pub fn parse_decision(s: &str) -> Option<Self> {
        match s {
            SubmissionStatus::APPROVED => Some(SubmissionStatus::Approved),
            SubmissionStatus::REJECTED => Some(SubmissionStatus::Rejected),
            _ => None,
        }
    }

    /// 同步到任务上的状态
    pub fn as_task_status(&self) -> TaskStatus {
        match self {
            SubmissionStatus::Pending => TaskStatus::Pending,
            SubmissionStatus::Approved => TaskStatus::Approved,
            SubmissionStatus::Rejected => TaskStatus::Rejected,
        }
    }
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<SubmissionStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的提交状态: '{s}'. 支持的状态: PENDING, APPROVED, REJECTED"
            ))
        })
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Pending => write!(f, "{}", SubmissionStatus::PENDING),
            SubmissionStatus::Approved => write!(f, "{}", SubmissionStatus::APPROVED),
            SubmissionStatus::Rejected => write!(f, "{}", SubmissionStatus::REJECTED),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SubmissionStatus::PENDING => Ok(SubmissionStatus::Pending),
            SubmissionStatus::APPROVED => Ok(SubmissionStatus::Approved),
            SubmissionStatus::REJECTED => Ok(SubmissionStatus::Rejected),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

// 任务提交实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct TaskSubmission {
    pub id: Uuid,
    pub task_id: Uuid,
    pub student_id: Uuid,
    pub validated_by: Option<Uuid>,
    pub submission_link: String,
    pub branch_name: Option<String>,
    pub evidence_file: Option<String>,
    pub status: SubmissionStatus,
    pub feedback: Option<String>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub validated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// 已有待审提交时的冲突信息
pub const ALREADY_PENDING: &str = "A submission for this task is already pending review";
/// 任务已通过时的冲突信息
pub const ALREADY_APPROVED: &str = "This task has already been approved";

/// 待审提交的唯一键，用于数据库层面的并发保护
pub fn pending_key(task_id: Uuid, student_id: Uuid) -> String {
    format!("{task_id}:{student_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decision() {
        assert_eq!(
            SubmissionStatus::parse_decision("APPROVED"),
            Some(SubmissionStatus::Approved)
        );
        assert_eq!(
            SubmissionStatus::parse_decision("REJECTED"),
            Some(SubmissionStatus::Rejected)
        );
        assert_eq!(SubmissionStatus::parse_decision("PENDING"), None);
        assert_eq!(SubmissionStatus::parse_decision("approved"), None);
    }

    #[test]
    fn test_mirrors_onto_task_status() {
        assert_eq!(
            SubmissionStatus::Approved.as_task_status(),
            TaskStatus::Approved
        );
        assert_eq!(
            SubmissionStatus::Rejected.as_task_status(),
            TaskStatus::Rejected
        );
    }
}
