use super::{SeaOrmStorage, map_write_err};
use crate::entity::countries::{ActiveModel, Column, Entity as Countries};
use crate::errors::{Result, TkseError};
use crate::models::countries::{
    entities::Country,
    requests::{CreateCountryRequest, UpdateCountryRequest},
};
use crate::utils::time::now_millis;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

impl SeaOrmStorage {
    /// 活跃国家中名称或代码是否已被占用
    async fn country_taken(
        &self,
        name: Option<&str>,
        code: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<bool> {
        let mut cond = Condition::any();
        if let Some(name) = name {
            cond = cond.add(Column::Name.eq(name));
        }
        if let Some(code) = code {
            cond = cond.add(Column::Code.eq(code));
        }
        if cond.is_empty() {
            return Ok(false);
        }

        let mut select = Countries::find()
            .filter(Column::IsActive.eq(true))
            .filter(cond);
        if let Some(id) = exclude {
            select = select.filter(Column::Id.ne(id));
        }

        let existing = select
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询国家失败: {e}")))?;
        Ok(existing.is_some())
    }

    /// 创建国家
    pub async fn create_country_impl(&self, req: CreateCountryRequest) -> Result<Country> {
        if self
            .country_taken(Some(&req.name), req.code.as_deref(), None)
            .await?
        {
            return Err(TkseError::conflict("Country name or code already exists"));
        }

        let now = now_millis();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(req.name),
            code: Set(req.code),
            flag_image: Set(req.flag_image),
            is_active: Set(true),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            map_write_err(e, "Country name or code already exists", "创建国家失败")
        })?;

        Ok(result.into_country())
    }

    /// 通过 ID 获取国家
    pub async fn get_country_by_id_impl(&self, id: Uuid) -> Result<Option<Country>> {
        let result = Countries::find_by_id(id)
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询国家失败: {e}")))?;

        Ok(result.map(|m| m.into_country()))
    }

    /// 列出活跃国家
    pub async fn list_countries_impl(&self) -> Result<Vec<Country>> {
        let result = Countries::find()
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询国家列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_country()).collect())
    }

    /// 更新国家
    pub async fn update_country_impl(
        &self,
        id: Uuid,
        update: UpdateCountryRequest,
    ) -> Result<Option<Country>> {
        if self.get_country_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }
        if self
            .country_taken(update.name.as_deref(), update.code.as_deref(), Some(id))
            .await?
        {
            return Err(TkseError::conflict("Country name or code already exists"));
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_millis()),
            ..Default::default()
        };
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(code) = update.code {
            model.code = Set(Some(code));
        }
        if let Some(flag_image) = update.flag_image {
            model.flag_image = Set(Some(flag_image));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("更新国家失败: {e}")))?;

        self.get_country_by_id_impl(id).await
    }

    /// 软删除国家
    pub async fn delete_country_impl(&self, id: Uuid) -> Result<bool> {
        let now = now_millis();
        let result = Countries::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .col_expr(Column::DeletedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("删除国家失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
