//! 任务提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "task_submissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub task_id: Uuid,
    pub student_id: Uuid,
    pub validated_by: Option<Uuid>,
    pub submission_link: String,
    pub branch_name: Option<String>,
    pub evidence_file: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    /// 仅待审状态下非空，唯一
    #[sea_orm(unique)]
    pub pending_key: Option<String>,
    pub submitted_at: i64,
    pub validated_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tasks::Entity",
        from = "Column::TaskId",
        to = "super::tasks::Column::Id"
    )]
    Task,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::enterprises::Entity",
        from = "Column::ValidatedBy",
        to = "super::enterprises::Column::Id"
    )]
    Validator,
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::enterprises::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Validator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::TaskSubmission {
        use crate::models::submissions::entities::{SubmissionStatus, TaskSubmission};
        use crate::utils::time::from_millis;

        TaskSubmission {
            id: self.id,
            task_id: self.task_id,
            student_id: self.student_id,
            validated_by: self.validated_by,
            submission_link: self.submission_link,
            branch_name: self.branch_name,
            evidence_file: self.evidence_file,
            status: self
                .status
                .parse::<SubmissionStatus>()
                .unwrap_or(SubmissionStatus::Pending),
            feedback: self.feedback,
            submitted_at: from_millis(self.submitted_at),
            validated_at: self.validated_at.map(from_millis),
        }
    }
}
