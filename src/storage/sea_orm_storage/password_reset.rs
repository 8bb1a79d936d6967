use super::SeaOrmStorage;
use crate::entity::enterprises::{self, Entity as Enterprises};
use crate::entity::password_reset_tokens::{ActiveModel, Column, Entity as PasswordResetTokens};
use crate::entity::students::{self, Entity as Students};
use crate::errors::{Result, TkseError};
use crate::models::{auth::AccountType, password_reset::entities::PasswordResetToken};
use crate::utils::random_code::generate_reset_token;
use crate::utils::time::now_millis;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use uuid::Uuid;

const INVALID_TOKEN: &str = "Invalid or expired token";

impl SeaOrmStorage {
    /// 作废旧令牌并创建新令牌
    pub async fn create_reset_token_impl(
        &self,
        email: &str,
        account_type: AccountType,
        account_id: Uuid,
        ttl_minutes: i64,
    ) -> Result<PasswordResetToken> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TkseError::database_operation(format!("开启事务失败: {e}")))?;

        PasswordResetTokens::update_many()
            .col_expr(Column::IsUsed, Expr::value(true))
            .filter(Column::AccountId.eq(account_id))
            .filter(Column::AccountType.eq(account_type.to_string()))
            .filter(Column::IsUsed.eq(false))
            .exec(&txn)
            .await
            .map_err(|e| TkseError::database_operation(format!("作废旧令牌失败: {e}")))?;

        let now = now_millis();
        let result = ActiveModel {
            id: Set(Uuid::new_v4()),
            token: Set(generate_reset_token()),
            email: Set(email.to_string()),
            account_type: Set(account_type.to_string()),
            account_id: Set(account_id),
            is_used: Set(false),
            created_at: Set(now),
            expires_at: Set(now + ttl_minutes * 60 * 1000),
        }
        .insert(&txn)
        .await
        .map_err(|e| TkseError::database_operation(format!("创建重置令牌失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| TkseError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_reset_token())
    }

    /// 查询令牌
    pub async fn get_reset_token_impl(&self, token: &str) -> Result<Option<PasswordResetToken>> {
        let result = PasswordResetTokens::find()
            .filter(Column::Token.eq(token))
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询重置令牌失败: {e}")))?;

        Ok(result.map(|m| m.into_reset_token()))
    }

    /// 使用令牌重置密码
    pub async fn consume_reset_token_impl(&self, token: &str, password_hash: &str) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TkseError::database_operation(format!("开启事务失败: {e}")))?;

        let now = now_millis();
        let record = PasswordResetTokens::find()
            .filter(Column::Token.eq(token))
            .filter(Column::IsUsed.eq(false))
            .filter(Column::ExpiresAt.gt(now))
            .one(&txn)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询重置令牌失败: {e}")))?
            .ok_or_else(|| TkseError::validation(INVALID_TOKEN))?;

        let account_type = record
            .account_type
            .parse::<AccountType>()
            .map_err(|_| TkseError::validation(INVALID_TOKEN))?;

        let affected = match account_type {
            AccountType::Enterprise => Enterprises::update_many()
                .col_expr(enterprises::Column::PasswordHash, Expr::value(password_hash))
                .col_expr(enterprises::Column::UpdatedAt, Expr::value(now))
                .filter(enterprises::Column::Id.eq(record.account_id))
                .filter(enterprises::Column::IsActive.eq(true))
                .exec(&txn)
                .await
                .map_err(|e| TkseError::database_operation(format!("更新企业密码失败: {e}")))?
                .rows_affected,
            AccountType::Student => Students::update_many()
                .col_expr(students::Column::PasswordHash, Expr::value(password_hash))
                .col_expr(students::Column::UpdatedAt, Expr::value(now))
                .filter(students::Column::Id.eq(record.account_id))
                .filter(students::Column::IsActive.eq(true))
                .exec(&txn)
                .await
                .map_err(|e| TkseError::database_operation(format!("更新学生密码失败: {e}")))?
                .rows_affected,
        };
        if affected == 0 {
            return Err(TkseError::not_found("Account not found"));
        }

        PasswordResetTokens::update_many()
            .col_expr(Column::IsUsed, Expr::value(true))
            .filter(Column::Id.eq(record.id))
            .exec(&txn)
            .await
            .map_err(|e| TkseError::database_operation(format!("更新重置令牌失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| TkseError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(())
    }

    /// 删除令牌
    pub async fn delete_reset_token_impl(&self, id: Uuid) -> Result<bool> {
        let result = PasswordResetTokens::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("删除重置令牌失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
