use super::{SeaOrmStorage, map_write_err};
use crate::entity::enterprises::{ActiveModel, Column, Entity as Enterprises};
use crate::entity::projects::{self, Entity as Projects};
use crate::errors::{Result, TkseError};
use crate::models::enterprises::{
    entities::Enterprise,
    requests::{CreateEnterpriseRequest, UpdateEnterpriseRequest},
};
use crate::utils::time::now_millis;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use uuid::Uuid;

impl SeaOrmStorage {
    /// 创建企业
    pub async fn create_enterprise_impl(&self, req: CreateEnterpriseRequest) -> Result<Enterprise> {
        // 邮箱与 CNPJ 唯一（包含已停用账号）
        let mut cond = Condition::any().add(Column::Email.eq(req.email.as_str()));
        if let Some(ref cnpj) = req.cnpj {
            cond = cond.add(Column::Cnpj.eq(cnpj.as_str()));
        }
        let existing = Enterprises::find()
            .filter(cond)
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询企业失败: {e}")))?;
        if existing.is_some() {
            return Err(TkseError::conflict("Email or CNPJ already registered"));
        }

        let now = now_millis();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(req.name),
            email: Set(req.email),
            cnpj: Set(req.cnpj),
            legal_name: Set(req.legal_name),
            trade_name: Set(req.trade_name),
            state_registration: Set(req.state_registration),
            municipal_registration: Set(req.municipal_registration),
            phone: Set(req.phone),
            website: Set(req.website),
            address: Set(req.address),
            city: Set(req.city),
            state: Set(req.state),
            zip_code: Set(req.zip_code),
            country: Set(req.country),
            country_id: Set(req.country_id),
            responsible_person: Set(req.responsible_person),
            password_hash: Set(req.password),
            profile_image_path: Set(req.profile_image_path),
            is_active: Set(true),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            map_write_err(e, "Email or CNPJ already registered", "创建企业失败")
        })?;

        Ok(result.into_enterprise())
    }

    /// 通过 ID 获取企业
    pub async fn get_enterprise_by_id_impl(&self, id: Uuid) -> Result<Option<Enterprise>> {
        let result = Enterprises::find_by_id(id)
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询企业失败: {e}")))?;

        Ok(result.map(|m| m.into_enterprise()))
    }

    /// 通过邮箱获取企业
    pub async fn get_enterprise_by_email_impl(&self, email: &str) -> Result<Option<Enterprise>> {
        let result = Enterprises::find()
            .filter(Column::Email.eq(email))
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询企业失败: {e}")))?;

        Ok(result.map(|m| m.into_enterprise()))
    }

    /// 更新企业资料
    pub async fn update_enterprise_impl(
        &self,
        id: Uuid,
        update: UpdateEnterpriseRequest,
    ) -> Result<Option<Enterprise>> {
        if self.get_enterprise_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_millis()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(cnpj) = update.cnpj {
            model.cnpj = Set(Some(cnpj));
        }
        if let Some(legal_name) = update.legal_name {
            model.legal_name = Set(Some(legal_name));
        }
        if let Some(trade_name) = update.trade_name {
            model.trade_name = Set(Some(trade_name));
        }
        if let Some(v) = update.state_registration {
            model.state_registration = Set(Some(v));
        }
        if let Some(v) = update.municipal_registration {
            model.municipal_registration = Set(Some(v));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(website) = update.website {
            model.website = Set(Some(website));
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }
        if let Some(city) = update.city {
            model.city = Set(Some(city));
        }
        if let Some(state) = update.state {
            model.state = Set(Some(state));
        }
        if let Some(zip_code) = update.zip_code {
            model.zip_code = Set(Some(zip_code));
        }
        if let Some(country) = update.country {
            model.country = Set(Some(country));
        }
        if let Some(country_id) = update.country_id {
            model.country_id = Set(Some(country_id));
        }
        if let Some(v) = update.responsible_person {
            model.responsible_person = Set(Some(v));
        }
        if let Some(v) = update.profile_image_path {
            model.profile_image_path = Set(Some(v));
        }

        model.update(&self.db).await.map_err(|e| {
            map_write_err(e, "Email or CNPJ already registered", "更新企业失败")
        })?;

        self.get_enterprise_by_id_impl(id).await
    }

    /// 软删除企业
    pub async fn delete_enterprise_impl(&self, id: Uuid) -> Result<bool> {
        let now = now_millis();
        let result = Enterprises::update_many()
            .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .col_expr(Column::DeletedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("删除企业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新企业密码
    pub async fn update_enterprise_password_impl(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool> {
        let result = Enterprises::update_many()
            .col_expr(
                Column::PasswordHash,
                sea_orm::sea_query::Expr::value(password_hash),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now_millis()))
            .filter(Column::Id.eq(id))
            .filter(Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("更新企业密码失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生参与项目所属的企业，去重并按名称排序
    pub async fn list_enterprises_by_student_impl(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<Enterprise>> {
        let links = self.student_links(student_id).await?;
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let project_ids: Vec<Uuid> = links.iter().map(|l| l.project_id).collect();
        let enterprise_ids: Vec<Uuid> = Projects::find()
            .select_only()
            .column(projects::Column::EnterpriseId)
            .distinct()
            .filter(projects::Column::Id.is_in(project_ids))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询项目所属企业失败: {e}")))?;
        if enterprise_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = Enterprises::find()
            .filter(Column::Id.is_in(enterprise_ids))
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询企业失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_enterprise()).collect())
    }
}
