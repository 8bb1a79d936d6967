//! 密码重置令牌实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "password_reset_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub token: String,
    pub email: String,
    pub account_type: String,
    pub account_id: Uuid,
    pub is_used: bool,
    pub created_at: i64,
    pub expires_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_reset_token(self) -> crate::models::password_reset::entities::PasswordResetToken {
        use crate::models::auth::AccountType;
        use crate::utils::time::from_millis;

        crate::models::password_reset::entities::PasswordResetToken {
            id: self.id,
            token: self.token,
            email: self.email,
            account_type: self
                .account_type
                .parse::<AccountType>()
                .unwrap_or(AccountType::Student),
            account_id: self.account_id,
            is_used: self.is_used,
            created_at: from_millis(self.created_at),
            expires_at: from_millis(self.expires_at),
        }
    }
}
