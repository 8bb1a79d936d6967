//! 项目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub enterprise_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// JSON 字符串数组
    #[sea_orm(column_type = "Text")]
    pub technologies: String,
    pub complexity: Option<String>,
    pub category: Option<String>,
    pub score: Option<i32>,
    pub country: Option<String>,
    pub blob_path: Option<String>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enterprises::Entity",
        from = "Column::EnterpriseId",
        to = "super::enterprises::Column::Id"
    )]
    Enterprise,
    #[sea_orm(has_many = "super::deliverables::Entity")]
    Deliverables,
    #[sea_orm(has_many = "super::student_projects::Entity")]
    StudentProjects,
}

impl Related<super::enterprises::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enterprise.def()
    }
}

impl Related<super::deliverables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deliverables.def()
    }
}

impl Related<super::student_projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentProjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_project(self) -> crate::models::projects::entities::Project {
        use crate::models::projects::entities::{Project, ProjectStatus};
        use crate::utils::time::from_millis;

        Project {
            id: self.id,
            enterprise_id: self.enterprise_id,
            name: self.name,
            description: self.description,
            technologies: serde_json::from_str(&self.technologies).unwrap_or_default(),
            complexity: self.complexity,
            category: self.category,
            score: self.score,
            country: self.country,
            blob_path: self.blob_path,
            status: self
                .status
                .parse::<ProjectStatus>()
                .unwrap_or(ProjectStatus::Pending),
            created_at: from_millis(self.created_at),
            updated_at: from_millis(self.updated_at),
        }
    }
}
