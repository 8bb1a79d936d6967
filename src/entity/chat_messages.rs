//! 聊天消息实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "chat_messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub from_id: String,
    pub to_id: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_chat_message(self) -> crate::models::chat::entities::ChatMessage {
        crate::models::chat::entities::ChatMessage {
            id: self.id,
            from_id: self.from_id,
            to_id: self.to_id,
            content: self.content,
            created_at: crate::utils::time::from_millis(self.created_at),
        }
    }
}
