//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 多行变更（发布项目、状态流转、提交与审核、密码重置）均在单个事务中完成。

mod chat;
mod countries;
mod dashboard;
mod enterprises;
mod password_reset;
mod projects;
mod students;
mod submissions;

#[cfg(test)]
mod tests;

use crate::config::AppConfig;
use crate::errors::{Result, TkseError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 使用已有连接创建存储并运行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| TkseError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| TkseError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| TkseError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| TkseError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(TkseError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 唯一约束冲突映射为 Conflict，其余为数据库操作错误
pub(crate) fn map_write_err(e: DbErr, conflict_msg: &str, context: &str) -> TkseError {
    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        TkseError::conflict(conflict_msg)
    } else {
        TkseError::database_operation(format!("{context}: {e}"))
    }
}

// Storage trait 实现
use crate::models::{
    auth::AccountType,
    chat::entities::ChatMessage,
    countries::{
        entities::Country,
        requests::{CreateCountryRequest, UpdateCountryRequest},
    },
    dashboard::responses::{DeliveriesSeries, EnterpriseDashboardSummary, StudentDashboard},
    enterprises::{
        entities::Enterprise,
        requests::{CreateEnterpriseRequest, UpdateEnterpriseRequest},
    },
    password_reset::entities::PasswordResetToken,
    projects::{
        entities::{DeliverableDetail, ProjectDetail, ProjectStatus, StudentProject},
        requests::{ProjectListQuery, PublishProjectRequest, UpdateProjectRequest},
        responses::{ProjectListResponse, StudentProjectItem},
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    submissions::{
        entities::TaskSubmission,
        requests::{CreateSubmissionRequest, SubmissionReviewQuery},
        responses::{StudentSubmissionItem, SubmissionReviewListResponse},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 企业模块
    async fn create_enterprise(&self, req: CreateEnterpriseRequest) -> Result<Enterprise> {
        self.create_enterprise_impl(req).await
    }

    async fn get_enterprise_by_id(&self, id: Uuid) -> Result<Option<Enterprise>> {
        self.get_enterprise_by_id_impl(id).await
    }

    async fn get_enterprise_by_email(&self, email: &str) -> Result<Option<Enterprise>> {
        self.get_enterprise_by_email_impl(email).await
    }

    async fn update_enterprise(
        &self,
        id: Uuid,
        update: UpdateEnterpriseRequest,
    ) -> Result<Option<Enterprise>> {
        self.update_enterprise_impl(id, update).await
    }

    async fn delete_enterprise(&self, id: Uuid) -> Result<bool> {
        self.delete_enterprise_impl(id).await
    }

    async fn update_enterprise_password(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        self.update_enterprise_password_impl(id, password_hash)
            .await
    }

    async fn list_enterprises_by_student(&self, student_id: Uuid) -> Result<Vec<Enterprise>> {
        self.list_enterprises_by_student_impl(student_id).await
    }

    // 学生模块
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(req).await
    }

    async fn get_student_by_id(&self, id: Uuid) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        self.get_student_by_email_impl(email).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn update_student(
        &self,
        id: Uuid,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn delete_student(&self, id: Uuid) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    async fn update_student_password(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        self.update_student_password_impl(id, password_hash).await
    }

    async fn dismiss_student_welcome(&self, id: Uuid) -> Result<Option<Student>> {
        self.dismiss_student_welcome_impl(id).await
    }

    // 国家模块
    async fn create_country(&self, req: CreateCountryRequest) -> Result<Country> {
        self.create_country_impl(req).await
    }

    async fn get_country_by_id(&self, id: Uuid) -> Result<Option<Country>> {
        self.get_country_by_id_impl(id).await
    }

    async fn list_countries(&self) -> Result<Vec<Country>> {
        self.list_countries_impl().await
    }

    async fn update_country(
        &self,
        id: Uuid,
        update: UpdateCountryRequest,
    ) -> Result<Option<Country>> {
        self.update_country_impl(id, update).await
    }

    async fn delete_country(&self, id: Uuid) -> Result<bool> {
        self.delete_country_impl(id).await
    }

    // 项目模块
    async fn publish_project(
        &self,
        enterprise_id: Uuid,
        req: PublishProjectRequest,
    ) -> Result<ProjectDetail> {
        self.publish_project_impl(enterprise_id, req).await
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<ProjectDetail>> {
        self.get_project_impl(id).await
    }

    async fn list_projects_with_pagination(
        &self,
        query: ProjectListQuery,
    ) -> Result<ProjectListResponse> {
        self.list_projects_with_pagination_impl(query).await
    }

    async fn list_visible_projects(&self) -> Result<Vec<ProjectDetail>> {
        self.list_visible_projects_impl().await
    }

    async fn list_enterprise_projects(&self, enterprise_id: Uuid) -> Result<Vec<ProjectDetail>> {
        self.list_enterprise_projects_impl(enterprise_id).await
    }

    async fn update_project(
        &self,
        id: Uuid,
        update: UpdateProjectRequest,
    ) -> Result<Option<ProjectDetail>> {
        self.update_project_impl(id, update).await
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool> {
        self.delete_project_impl(id).await
    }

    async fn transition_project(&self, id: Uuid, next: ProjectStatus) -> Result<ProjectDetail> {
        self.transition_project_impl(id, next).await
    }

    async fn join_project(&self, student_id: Uuid, project_id: Uuid) -> Result<StudentProject> {
        self.join_project_impl(student_id, project_id).await
    }

    async fn list_student_projects(&self, student_id: Uuid) -> Result<Vec<StudentProjectItem>> {
        self.list_student_projects_impl(student_id).await
    }

    async fn list_student_deliverables(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<DeliverableDetail>> {
        self.list_student_deliverables_impl(student_id).await
    }

    // 提交模块
    async fn create_submission(
        &self,
        student_id: Uuid,
        req: CreateSubmissionRequest,
    ) -> Result<TaskSubmission> {
        self.create_submission_impl(student_id, req).await
    }

    async fn validate_submission(
        &self,
        submission_id: Uuid,
        validator_id: Uuid,
        decision: &str,
        feedback: Option<String>,
    ) -> Result<TaskSubmission> {
        self.validate_submission_impl(submission_id, validator_id, decision, feedback)
            .await
    }

    async fn get_submission(&self, id: Uuid) -> Result<Option<TaskSubmission>> {
        self.get_submission_impl(id).await
    }

    async fn get_submission_owner(&self, submission_id: Uuid) -> Result<Option<Uuid>> {
        self.get_submission_owner_impl(submission_id).await
    }

    async fn list_submissions_for_review(
        &self,
        enterprise_id: Uuid,
        query: SubmissionReviewQuery,
    ) -> Result<SubmissionReviewListResponse> {
        self.list_submissions_for_review_impl(enterprise_id, query)
            .await
    }

    async fn list_student_submissions(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<StudentSubmissionItem>> {
        self.list_student_submissions_impl(student_id).await
    }

    // 密码重置模块
    async fn create_reset_token(
        &self,
        email: &str,
        account_type: AccountType,
        account_id: Uuid,
        ttl_minutes: i64,
    ) -> Result<PasswordResetToken> {
        self.create_reset_token_impl(email, account_type, account_id, ttl_minutes)
            .await
    }

    async fn get_reset_token(&self, token: &str) -> Result<Option<PasswordResetToken>> {
        self.get_reset_token_impl(token).await
    }

    async fn consume_reset_token(&self, token: &str, password_hash: &str) -> Result<()> {
        self.consume_reset_token_impl(token, password_hash).await
    }

    async fn delete_reset_token(&self, id: Uuid) -> Result<bool> {
        self.delete_reset_token_impl(id).await
    }

    // 聊天模块
    async fn save_chat_message(
        &self,
        from_id: &str,
        to_id: &str,
        content: &str,
    ) -> Result<ChatMessage> {
        self.save_chat_message_impl(from_id, to_id, content).await
    }

    async fn chat_history(&self, user1: &str, user2: &str) -> Result<Vec<ChatMessage>> {
        self.chat_history_impl(user1, user2).await
    }

    // 统计模块
    async fn enterprise_dashboard_summary(
        &self,
        enterprise_id: Uuid,
    ) -> Result<EnterpriseDashboardSummary> {
        self.enterprise_dashboard_summary_impl(enterprise_id).await
    }

    async fn deliveries_per_project(
        &self,
        enterprise_id: Uuid,
        project_ids: Option<Vec<Uuid>>,
        year: i32,
    ) -> Result<Vec<DeliveriesSeries>> {
        self.deliveries_per_project_impl(enterprise_id, project_ids, year)
            .await
    }

    async fn student_dashboard(&self, student_id: Uuid) -> Result<StudentDashboard> {
        self.student_dashboard_impl(student_id).await
    }
}
