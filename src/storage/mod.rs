use std::sync::Arc;

use uuid::Uuid;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 企业管理方法
    // 创建企业（password 字段为已哈希的密码）
    async fn create_enterprise(&self, req: CreateEnterpriseRequest) -> Result<Enterprise>;
    // 通过ID获取企业（仅活跃）
    async fn get_enterprise_by_id(&self, id: Uuid) -> Result<Option<Enterprise>>;
    // 通过邮箱获取企业（仅活跃）
    async fn get_enterprise_by_email(&self, email: &str) -> Result<Option<Enterprise>>;
    // 更新企业资料
    async fn update_enterprise(
        &self,
        id: Uuid,
        update: UpdateEnterpriseRequest,
    ) -> Result<Option<Enterprise>>;
    // 软删除企业
    async fn delete_enterprise(&self, id: Uuid) -> Result<bool>;
    // 更新企业密码哈希
    async fn update_enterprise_password(&self, id: Uuid, password_hash: &str) -> Result<bool>;
    // 学生参与过项目的企业；学生不存在时返回 NotFound
    async fn list_enterprises_by_student(&self, student_id: Uuid) -> Result<Vec<Enterprise>>;

    /// 学生管理方法
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, id: Uuid) -> Result<Option<Student>>;
    async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    async fn update_student(
        &self,
        id: Uuid,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    async fn delete_student(&self, id: Uuid) -> Result<bool>;
    async fn update_student_password(&self, id: Uuid, password_hash: &str) -> Result<bool>;
    // 关闭欢迎引导
    async fn dismiss_student_welcome(&self, id: Uuid) -> Result<Option<Student>>;

    /// 国家管理方法
    async fn create_country(&self, req: CreateCountryRequest) -> Result<Country>;
    async fn get_country_by_id(&self, id: Uuid) -> Result<Option<Country>>;
    async fn list_countries(&self) -> Result<Vec<Country>>;
    async fn update_country(
        &self,
        id: Uuid,
        update: UpdateCountryRequest,
    ) -> Result<Option<Country>>;
    async fn delete_country(&self, id: Uuid) -> Result<bool>;

    /// 项目管理方法
    // 在一个事务中创建项目及其交付物、任务、验收标准
    async fn publish_project(
        &self,
        enterprise_id: Uuid,
        req: PublishProjectRequest,
    ) -> Result<ProjectDetail>;
    async fn get_project(&self, id: Uuid) -> Result<Option<ProjectDetail>>;
    async fn list_projects_with_pagination(
        &self,
        query: ProjectListQuery,
    ) -> Result<ProjectListResponse>;
    // 学生可浏览的项目（OPEN / IN_PROGRESS）
    async fn list_visible_projects(&self) -> Result<Vec<ProjectDetail>>;
    async fn list_enterprise_projects(&self, enterprise_id: Uuid) -> Result<Vec<ProjectDetail>>;
    async fn update_project(
        &self,
        id: Uuid,
        update: UpdateProjectRequest,
    ) -> Result<Option<ProjectDetail>>;
    async fn delete_project(&self, id: Uuid) -> Result<bool>;
    // 项目状态流转，级联更新交付物
    async fn transition_project(&self, id: Uuid, next: ProjectStatus) -> Result<ProjectDetail>;

    /// 学生项目方法
    async fn join_project(&self, student_id: Uuid, project_id: Uuid) -> Result<StudentProject>;
    async fn list_student_projects(&self, student_id: Uuid) -> Result<Vec<StudentProjectItem>>;
    async fn list_student_deliverables(&self, student_id: Uuid)
    -> Result<Vec<DeliverableDetail>>;

    /// 任务提交方法
    async fn create_submission(
        &self,
        student_id: Uuid,
        req: CreateSubmissionRequest,
    ) -> Result<TaskSubmission>;
    async fn validate_submission(
        &self,
        submission_id: Uuid,
        validator_id: Uuid,
        decision: &str,
        feedback: Option<String>,
    ) -> Result<TaskSubmission>;
    async fn get_submission(&self, id: Uuid) -> Result<Option<TaskSubmission>>;
    // 提交所属项目的企业ID
    async fn get_submission_owner(&self, submission_id: Uuid) -> Result<Option<Uuid>>;
    async fn list_submissions_for_review(
        &self,
        enterprise_id: Uuid,
        query: SubmissionReviewQuery,
    ) -> Result<SubmissionReviewListResponse>;
    async fn list_student_submissions(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<StudentSubmissionItem>>;

    /// 密码重置方法
    // 作废该账号旧令牌并写入新令牌
    async fn create_reset_token(
        &self,
        email: &str,
        account_type: AccountType,
        account_id: Uuid,
        ttl_minutes: i64,
    ) -> Result<PasswordResetToken>;
    async fn get_reset_token(&self, token: &str) -> Result<Option<PasswordResetToken>>;
    // 校验令牌并在一个事务中更新密码、标记令牌已使用
    async fn consume_reset_token(&self, token: &str, password_hash: &str) -> Result<()>;
    async fn delete_reset_token(&self, id: Uuid) -> Result<bool>;

    /// 聊天方法
    async fn save_chat_message(&self, from_id: &str, to_id: &str, content: &str)
    -> Result<ChatMessage>;
    async fn chat_history(&self, user1: &str, user2: &str) -> Result<Vec<ChatMessage>>;

    /// 统计方法
    async fn enterprise_dashboard_summary(
        &self,
        enterprise_id: Uuid,
    ) -> Result<EnterpriseDashboardSummary>;
    async fn deliveries_per_project(
        &self,
        enterprise_id: Uuid,
        project_ids: Option<Vec<Uuid>>,
        year: i32,
    ) -> Result<Vec<DeliveriesSeries>>;
    async fn student_dashboard(&self, student_id: Uuid) -> Result<StudentDashboard>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
