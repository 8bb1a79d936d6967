//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub photo: Option<String>,
    pub cargo: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub welcome: bool,
    pub is_active: bool,
    pub deleted_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::task_submissions::Entity")]
    TaskSubmissions,
    #[sea_orm(has_many = "super::student_projects::Entity")]
    StudentProjects,
}

impl Related<super::task_submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskSubmissions.def()
    }
}

impl Related<super::student_projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentProjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use crate::utils::time::from_millis;

        crate::models::students::entities::Student {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            phone: self.phone,
            role: self.role,
            location: self.location,
            photo: self.photo,
            cargo: self.cargo,
            bio: self.bio,
            github: self.github,
            linkedin: self.linkedin,
            welcome: self.welcome,
            is_active: self.is_active,
            created_at: from_millis(self.created_at),
            updated_at: from_millis(self.updated_at),
        }
    }
}
