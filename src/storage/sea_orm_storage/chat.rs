use super::SeaOrmStorage;
use crate::entity::chat_messages::{ActiveModel, Column, Entity as ChatMessages};
use crate::errors::{Result, TkseError};
use crate::models::chat::entities::ChatMessage;
use crate::utils::time::now_millis;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

impl SeaOrmStorage {
    /// 保存聊天消息
    pub async fn save_chat_message_impl(
        &self,
        from_id: &str,
        to_id: &str,
        content: &str,
    ) -> Result<ChatMessage> {
        let result = ActiveModel {
            id: Set(Uuid::new_v4()),
            from_id: Set(from_id.to_string()),
            to_id: Set(to_id.to_string()),
            content: Set(content.to_string()),
            created_at: Set(now_millis()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| TkseError::database_operation(format!("保存聊天消息失败: {e}")))?;

        Ok(result.into_chat_message())
    }

    /// 两个用户之间的聊天记录，按时间升序
    pub async fn chat_history_impl(&self, user1: &str, user2: &str) -> Result<Vec<ChatMessage>> {
        let result = ChatMessages::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(Column::FromId.eq(user1))
                            .add(Column::ToId.eq(user2)),
                    )
                    .add(
                        Condition::all()
                            .add(Column::FromId.eq(user2))
                            .add(Column::ToId.eq(user1)),
                    ),
            )
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询聊天记录失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_chat_message()).collect())
    }
}
