//! 任务实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub deliverable_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub estimated_time: Option<f64>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::deliverables::Entity",
        from = "Column::DeliverableId",
        to = "super::deliverables::Column::Id"
    )]
    Deliverable,
    #[sea_orm(has_many = "super::acceptance_criteria::Entity")]
    AcceptanceCriteria,
    #[sea_orm(has_many = "super::task_submissions::Entity")]
    TaskSubmissions,
}

impl Related<super::deliverables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deliverable.def()
    }
}

impl Related<super::acceptance_criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcceptanceCriteria.def()
    }
}

impl Related<super::task_submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskSubmissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_task(self) -> crate::models::projects::entities::Task {
        use crate::models::projects::entities::{Task, TaskStatus};
        use crate::utils::time::from_millis;

        Task {
            id: self.id,
            deliverable_id: self.deliverable_id,
            name: self.name,
            description: self.description,
            estimated_time: self.estimated_time,
            status: TaskStatus::from_stored(&self.status),
            created_at: from_millis(self.created_at),
            updated_at: from_millis(self.updated_at),
        }
    }
}
