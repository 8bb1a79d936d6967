use super::{SeaOrmStorage, map_write_err};
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{Result, TkseError};
use crate::models::{
    PaginationInfo,
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
};
use crate::utils::search::{SearchTerm, order_by_ids, page_of};
use crate::utils::time::now_millis;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

impl SeaOrmStorage {
    /// 创建学生
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let existing = Students::find()
            .filter(Column::Email.eq(req.email.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询学生失败: {e}")))?;
        if existing.is_some() {
            return Err(TkseError::conflict("Email already registered"));
        }

        let now = now_millis();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(req.name),
            email: Set(req.email),
            password_hash: Set(req.password),
            phone: Set(req.phone),
            role: Set(req.role),
            location: Set(req.location),
            photo: Set(req.photo),
            cargo: Set(req.cargo),
            bio: Set(req.bio),
            github: Set(req.github),
            linkedin: Set(req.linkedin),
            welcome: Set(true),
            is_active: Set(true),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, "Email already registered", "创建学生失败"))?;

        Ok(result.into_student())
    }

    /// 通过 ID 获取学生
    pub async fn get_student_by_id_impl(&self, id: Uuid) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 通过邮箱获取学生
    pub async fn get_student_by_email_impl(&self, email: &str) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::Email.eq(email))
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学生
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = Students::find().filter(Column::IsActive.eq(true));

        select = select.order_by_desc(Column::CreatedAt);

        let (students, total) = match SearchTerm::parse(query.search.as_deref()) {
            // 姓名或邮箱，不区分大小写
            Some(term) => {
                let candidates: Vec<(Uuid, String, String)> = select
                    .select_only()
                    .column(Column::Id)
                    .column(Column::Name)
                    .column(Column::Email)
                    .into_tuple()
                    .all(&self.db)
                    .await
                    .map_err(|e| TkseError::database_operation(format!("查询学生列表失败: {e}")))?;

                let ids: Vec<Uuid> = candidates
                    .into_iter()
                    .filter(|(_, name, email)| term.matches_any([name.as_str(), email.as_str()]))
                    .map(|(id, ..)| id)
                    .collect();

                let page_ids = page_of(&ids, page, size);
                let models = if page_ids.is_empty() {
                    Vec::new()
                } else {
                    Students::find()
                        .filter(Column::Id.is_in(page_ids.clone()))
                        .all(&self.db)
                        .await
                        .map_err(|e| {
                            TkseError::database_operation(format!("查询学生列表失败: {e}"))
                        })?
                };
                (order_by_ids(models, &page_ids, |m| m.id), ids.len() as u64)
            }
            None => {
                let paginator = select.paginate(&self.db, size);
                let total = paginator
                    .num_items()
                    .await
                    .map_err(|e| TkseError::database_operation(format!("查询学生总数失败: {e}")))?;
                let models = paginator
                    .fetch_page(page - 1)
                    .await
                    .map_err(|e| TkseError::database_operation(format!("查询学生列表失败: {e}")))?;
                (models, total)
            }
        };

        Ok(StudentListResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 更新学生资料
    pub async fn update_student_impl(
        &self,
        id: Uuid,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(id).await?.is_none() {
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
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(role) = update.role {
            model.role = Set(Some(role));
        }
        if let Some(location) = update.location {
            model.location = Set(Some(location));
        }
        if let Some(photo) = update.photo {
            model.photo = Set(Some(photo));
        }
        if let Some(cargo) = update.cargo {
            model.cargo = Set(Some(cargo));
        }
        if let Some(bio) = update.bio {
            model.bio = Set(Some(bio));
        }
        if let Some(github) = update.github {
            model.github = Set(Some(github));
        }
        if let Some(linkedin) = update.linkedin {
            model.linkedin = Set(Some(linkedin));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| map_write_err(e, "Email already registered", "更新学生失败"))?;

        self.get_student_by_id_impl(id).await
    }

    /// 软删除学生
    pub async fn delete_student_impl(&self, id: Uuid) -> Result<bool> {
        let now = now_millis();
        let result = Students::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .col_expr(Column::DeletedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("删除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新学生密码
    pub async fn update_student_password_impl(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool> {
        let result = Students::update_many()
            .col_expr(Column::PasswordHash, Expr::value(password_hash))
            .col_expr(Column::UpdatedAt, Expr::value(now_millis()))
            .filter(Column::Id.eq(id))
            .filter(Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("更新学生密码失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 关闭欢迎引导
    pub async fn dismiss_student_welcome_impl(&self, id: Uuid) -> Result<Option<Student>> {
        let result = Students::update_many()
            .col_expr(Column::Welcome, Expr::value(false))
            .col_expr(Column::UpdatedAt, Expr::value(now_millis()))
            .filter(Column::Id.eq(id))
            .filter(Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("更新学生失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_student_by_id_impl(id).await
    }
}
