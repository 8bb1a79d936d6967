//! 项目、交付物、任务的业务实体与状态机规则
//!
//! 状态流转规则在这里以纯函数表达，存储层在事务中应用它们。

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// 为状态枚举生成 Display / FromStr / Deserialize，字符串形式为大写常量
macro_rules! status_enum_strings {
    ($name:ident, $label:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            pub fn all() -> &'static [$name] {
                &[$($name::$variant,)+]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {s}", $label)),
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse::<$name>().map_err(|_| {
                    let supported: Vec<&str> = $name::all().iter().map(|v| v.as_str()).collect();
                    serde::de::Error::custom(format!(
                        "无效的{}: '{s}'. 支持的值: {}",
                        $label,
                        supported.join(", ")
                    ))
                })
            }
        }
    };
}

// 项目状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub enum ProjectStatus {
    Pending,    // 待发布
    Open,       // 开放报名
    InProgress, // 进行中
    Completed,  // 已完成
    Cancelled,  // 已取消
}

status_enum_strings!(ProjectStatus, "project status", {
    Pending => "PENDING",
    Open => "OPEN",
    InProgress => "IN_PROGRESS",
    Completed => "COMPLETED",
    Cancelled => "CANCELLED",
});

impl ProjectStatus {
    /// 当前状态允许进入的目标状态
    pub fn allowed_transitions(&self) -> &'static [ProjectStatus] {
        match self {
            ProjectStatus::Pending => &[ProjectStatus::Open, ProjectStatus::Cancelled],
            ProjectStatus::Open => &[ProjectStatus::InProgress, ProjectStatus::Cancelled],
            ProjectStatus::InProgress => &[ProjectStatus::Completed, ProjectStatus::Cancelled],
            ProjectStatus::Completed | ProjectStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: ProjectStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// 学生是否可以加入该状态的项目
    pub fn accepts_students(&self) -> bool {
        !matches!(self, ProjectStatus::Pending | ProjectStatus::Cancelled)
    }

    /// 学生可浏览的项目状态
    pub fn visible_statuses() -> &'static [ProjectStatus] {
        &[ProjectStatus::Open, ProjectStatus::InProgress]
    }
}

// 交付物状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub enum DeliverableStatus {
    InPlanning,    // 规划中
    InDevelopment, // 开发中
    Completed,     // 已完成
}

status_enum_strings!(DeliverableStatus, "deliverable status", {
    InPlanning => "IN_PLANNING",
    InDevelopment => "IN_DEVELOPMENT",
    Completed => "COMPLETED",
});

impl DeliverableStatus {
    /// 项目进入 `project_status` 后交付物应变为的状态，None 表示不变
    pub fn after_project_transition(&self, project_status: ProjectStatus) -> Option<Self> {
        match (project_status, self) {
            (ProjectStatus::InProgress, DeliverableStatus::InPlanning) => {
                Some(DeliverableStatus::InDevelopment)
            }
            (ProjectStatus::Completed, DeliverableStatus::InDevelopment) => {
                Some(DeliverableStatus::Completed)
            }
            _ => None,
        }
    }
}

// 任务状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub enum TaskStatus {
    Pending,    // 待处理 / 待审核
    InProgress, // 进行中
    Approved,   // 已通过
    Rejected,   // 已驳回
}

status_enum_strings!(TaskStatus, "task status", {
    Pending => "PENDING",
    InProgress => "IN_PROGRESS",
    Approved => "APPROVED",
    Rejected => "REJECTED",
});

impl TaskStatus {
    /// 读取数据库中的状态，兼容旧版葡语标签
    pub fn from_stored(s: &str) -> Self {
        match s {
            "Pendente" => TaskStatus::Pending,
            "Concluída" => TaskStatus::Approved,
            other => other.parse().unwrap_or(TaskStatus::Pending),
        }
    }
}

// 项目实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct Project {
    pub id: Uuid,
    pub enterprise_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub complexity: Option<String>,
    pub category: Option<String>,
    pub score: Option<i32>,
    pub country: Option<String>,
    pub blob_path: Option<String>,
    pub status: ProjectStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 交付物实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct Deliverable {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub status: DeliverableStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 任务实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct Task {
    pub id: Uuid,
    pub deliverable_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub estimated_time: Option<f64>,
    pub status: TaskStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 验收标准
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct AcceptanceCriterion {
    pub id: Uuid,
    pub task_id: Uuid,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 任务及其验收标准
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub acceptance_criteria: Vec<AcceptanceCriterion>,
}

// 交付物及其任务
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct DeliverableDetail {
    #[serde(flatten)]
    pub deliverable: Deliverable,
    pub tasks: Vec<TaskDetail>,
}

impl DeliverableDetail {
    /// 全部任务已通过（无任务时视为完成）
    pub fn all_tasks_approved(&self) -> bool {
        self.tasks
            .iter()
            .all(|t| t.task.status == TaskStatus::Approved)
    }
}

// 完整项目结构，progress 为读取时计算的派生值
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub deliverables: Vec<DeliverableDetail>,
    pub progress: i32,
}

impl ProjectDetail {
    pub fn new(project: Project, deliverables: Vec<DeliverableDetail>) -> Self {
        let progress = compute_progress(&deliverables);
        Self {
            project,
            deliverables,
            progress,
        }
    }
}

/// 完成度：所有任务都已通过的交付物占比（四舍五入到整数百分比）
pub fn compute_progress(deliverables: &[DeliverableDetail]) -> i32 {
    if deliverables.is_empty() {
        return 0;
    }
    let done = deliverables.iter().filter(|d| d.all_tasks_approved()).count();
    ((done as f64 / deliverables.len() as f64) * 100.0).round() as i32
}

// 学生与项目的关联
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct StudentProject {
    pub id: Uuid,
    pub student_id: Uuid,
    pub project_id: Uuid,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(status: TaskStatus) -> TaskDetail {
        TaskDetail {
            task: Task {
                id: Uuid::new_v4(),
                deliverable_id: Uuid::nil(),
                name: "task".into(),
                description: None,
                estimated_time: Some(2.0),
                status,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            acceptance_criteria: vec![],
        }
    }

    fn deliverable(tasks: Vec<TaskDetail>) -> DeliverableDetail {
        DeliverableDetail {
            deliverable: Deliverable {
                id: Uuid::new_v4(),
                project_id: Uuid::nil(),
                name: "deliverable".into(),
                status: DeliverableStatus::InDevelopment,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            tasks,
        }
    }

    #[test]
    fn test_transition_table_covers_all_pairs() {
        use ProjectStatus::*;
        let legal = [
            (Pending, Open),
            (Pending, Cancelled),
            (Open, InProgress),
            (Open, Cancelled),
            (InProgress, Completed),
            (InProgress, Cancelled),
        ];

        for from in ProjectStatus::all() {
            for to in ProjectStatus::all() {
                let expected = legal.contains(&(*from, *to));
                assert_eq!(
                    from.can_transition_to(*to),
                    expected,
                    "{from} -> {to} should be {expected}"
                );
            }
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(ProjectStatus::Completed.is_terminal());
        assert!(ProjectStatus::Cancelled.is_terminal());
        assert!(!ProjectStatus::Pending.is_terminal());
        assert!(!ProjectStatus::Open.is_terminal());
        assert!(!ProjectStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_accepts_students() {
        assert!(!ProjectStatus::Pending.accepts_students());
        assert!(!ProjectStatus::Cancelled.accepts_students());
        assert!(ProjectStatus::Open.accepts_students());
        assert!(ProjectStatus::InProgress.accepts_students());
        assert!(ProjectStatus::Completed.accepts_students());
    }

    #[test]
    fn test_deliverable_cascade_on_start() {
        assert_eq!(
            DeliverableStatus::InPlanning.after_project_transition(ProjectStatus::InProgress),
            Some(DeliverableStatus::InDevelopment)
        );
        assert_eq!(
            DeliverableStatus::InDevelopment.after_project_transition(ProjectStatus::InProgress),
            None
        );
        assert_eq!(
            DeliverableStatus::Completed.after_project_transition(ProjectStatus::InProgress),
            None
        );
    }

    #[test]
    fn test_deliverable_cascade_on_complete() {
        assert_eq!(
            DeliverableStatus::InDevelopment.after_project_transition(ProjectStatus::Completed),
            Some(DeliverableStatus::Completed)
        );
        assert_eq!(
            DeliverableStatus::InPlanning.after_project_transition(ProjectStatus::Completed),
            None
        );
        assert_eq!(
            DeliverableStatus::InPlanning.after_project_transition(ProjectStatus::Cancelled),
            None
        );
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "IN_PROGRESS".parse::<ProjectStatus>(),
            Ok(ProjectStatus::InProgress)
        );
        assert!("in_progress".parse::<ProjectStatus>().is_err());
        assert!("FINISHED".parse::<ProjectStatus>().is_err());

        let status: ProjectStatus = serde_json::from_str("\"OPEN\"").unwrap();
        assert_eq!(status, ProjectStatus::Open);
        assert_eq!(
            serde_json::to_string(&ProjectStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert!(serde_json::from_str::<ProjectStatus>("\"DONE\"").is_err());
    }

    #[test]
    fn test_task_status_reads_legacy_labels() {
        assert_eq!(TaskStatus::from_stored("Pendente"), TaskStatus::Pending);
        assert_eq!(TaskStatus::from_stored("Concluída"), TaskStatus::Approved);
        assert_eq!(TaskStatus::from_stored("REJECTED"), TaskStatus::Rejected);
    }

    #[test]
    fn test_progress() {
        assert_eq!(compute_progress(&[]), 0);

        let deliverables = vec![
            deliverable(vec![task(TaskStatus::Approved), task(TaskStatus::Approved)]),
            deliverable(vec![task(TaskStatus::Approved), task(TaskStatus::Pending)]),
            deliverable(vec![task(TaskStatus::Rejected)]),
        ];
        assert_eq!(compute_progress(&deliverables), 33);

        // 无任务的交付物视为完成
        let deliverables = vec![
            deliverable(vec![]),
            deliverable(vec![task(TaskStatus::InProgress)]),
        ];
        assert_eq!(compute_progress(&deliverables), 50);
    }
}
