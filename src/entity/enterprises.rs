//! 企业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enterprises")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub cnpj: Option<String>,
    pub legal_name: Option<String>,
    pub trade_name: Option<String>,
    pub state_registration: Option<String>,
    pub municipal_registration: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub country_id: Option<Uuid>,
    pub responsible_person: Option<String>,
    pub password_hash: String,
    pub profile_image_path: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::countries::Entity",
        from = "Column::CountryId",
        to = "super::countries::Column::Id"
    )]
    Country,
    #[sea_orm(has_many = "super::projects::Entity")]
    Projects,
}

impl Related<super::countries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Country.def()
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_enterprise(self) -> crate::models::enterprises::entities::Enterprise {
        use crate::utils::time::from_millis;

        crate::models::enterprises::entities::Enterprise {
            id: self.id,
            name: self.name,
            email: self.email,
            cnpj: self.cnpj,
            legal_name: self.legal_name,
            trade_name: self.trade_name,
            state_registration: self.state_registration,
            municipal_registration: self.municipal_registration,
            phone: self.phone,
            website: self.website,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            country: self.country,
            country_id: self.country_id,
            responsible_person: self.responsible_person,
            password_hash: self.password_hash,
            profile_image_path: self.profile_image_path,
            is_active: self.is_active,
            created_at: from_millis(self.created_at),
            updated_at: from_millis(self.updated_at),
        }
    }
}
