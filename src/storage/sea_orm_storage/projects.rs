use std::collections::HashMap;

use super::{SeaOrmStorage, map_write_err};
use crate::entity::acceptance_criteria::{
    self, ActiveModel as CriterionActiveModel, Entity as AcceptanceCriteria,
};
use crate::entity::deliverables::{
    self, ActiveModel as DeliverableActiveModel, Entity as Deliverables,
};
use crate::entity::projects::{self, ActiveModel as ProjectActiveModel, Entity as Projects};
use crate::entity::student_projects::{
    self, ActiveModel as StudentProjectActiveModel, Entity as StudentProjects,
};
use crate::entity::students::{self, Entity as Students};
use crate::entity::tasks::{self, ActiveModel as TaskActiveModel, Entity as Tasks};
use crate::entity::enterprises::{self, Entity as Enterprises};
use crate::errors::{Result, TkseError};
use crate::models::{
    PaginationInfo,
    projects::{
        entities::{
            DeliverableDetail, DeliverableStatus, ProjectDetail, ProjectStatus, StudentProject,
            TaskDetail, TaskStatus,
        },
        requests::{ProjectListQuery, PublishProjectRequest, UpdateProjectRequest},
        responses::{ProjectListResponse, StudentProjectItem},
    },
};
use crate::utils::search::{SearchTerm, order_by_ids, page_of};
use crate::utils::time::{from_millis, now_millis};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

/// 批量加载交付物下的任务与验收标准
pub(super) async fn load_deliverable_details<C: ConnectionTrait>(
    db: &C,
    deliverables: Vec<deliverables::Model>,
) -> Result<Vec<DeliverableDetail>> {
    if deliverables.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = deliverables.iter().map(|d| d.id).collect();
    let task_models = Tasks::find()
        .filter(tasks::Column::DeliverableId.is_in(ids))
        .order_by_asc(tasks::Column::CreatedAt)
        .order_by_asc(tasks::Column::Name)
        .all(db)
        .await
        .map_err(|e| TkseError::database_operation(format!("查询任务失败: {e}")))?;

    let task_ids: Vec<Uuid> = task_models.iter().map(|t| t.id).collect();
    let criteria = if task_ids.is_empty() {
        Vec::new()
    } else {
        AcceptanceCriteria::find()
            .filter(acceptance_criteria::Column::TaskId.is_in(task_ids))
            .order_by_asc(acceptance_criteria::Column::CreatedAt)
            .all(db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询验收标准失败: {e}")))?
    };

    let mut criteria_by_task: HashMap<Uuid, Vec<_>> = HashMap::new();
    for c in criteria {
        criteria_by_task
            .entry(c.task_id)
            .or_default()
            .push(c.into_acceptance_criterion());
    }

    let mut tasks_by_deliverable: HashMap<Uuid, Vec<TaskDetail>> = HashMap::new();
    for t in task_models {
        let acceptance_criteria = criteria_by_task.remove(&t.id).unwrap_or_default();
        tasks_by_deliverable
            .entry(t.deliverable_id)
            .or_default()
            .push(TaskDetail {
                task: t.into_task(),
                acceptance_criteria,
            });
    }

    Ok(deliverables
        .into_iter()
        .map(|d| {
            let tasks = tasks_by_deliverable.remove(&d.id).unwrap_or_default();
            DeliverableDetail {
                deliverable: d.into_deliverable(),
                tasks,
            }
        })
        .collect())
}

/// 批量加载项目的完整结构
pub(super) async fn load_project_details<C: ConnectionTrait>(
    db: &C,
    projects: Vec<projects::Model>,
) -> Result<Vec<ProjectDetail>> {
    if projects.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
    let deliverable_models = Deliverables::find()
        .filter(deliverables::Column::ProjectId.is_in(ids))
        .order_by_asc(deliverables::Column::CreatedAt)
        .order_by_asc(deliverables::Column::Name)
        .all(db)
        .await
        .map_err(|e| TkseError::database_operation(format!("查询交付物失败: {e}")))?;

    let mut by_project: HashMap<Uuid, Vec<DeliverableDetail>> = HashMap::new();
    for d in load_deliverable_details(db, deliverable_models).await? {
        by_project
            .entry(d.deliverable.project_id)
            .or_default()
            .push(d);
    }

    Ok(projects
        .into_iter()
        .map(|p| {
            let deliverables = by_project.remove(&p.id).unwrap_or_default();
            ProjectDetail::new(p.into_project(), deliverables)
        })
        .collect())
}

/// 已存储的项目状态，无法识别时视为数据损坏
fn stored_project_status(project: &projects::Model) -> Result<ProjectStatus> {
    project.status.parse::<ProjectStatus>().map_err(|e| {
        TkseError::database_operation(format!("项目 {} 的状态无法识别: {e}", project.id))
    })
}

/// 写入项目状态并级联交付物
///
/// 以 `from` 为条件更新，读取之后状态已被并发请求改变时不写入任何行并返回 Conflict。
pub(super) async fn apply_transition<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    from: ProjectStatus,
    next: ProjectStatus,
    now: i64,
) -> Result<()> {
    let updated = Projects::update_many()
        .col_expr(projects::Column::Status, Expr::value(next.as_str()))
        .col_expr(projects::Column::UpdatedAt, Expr::value(now))
        .filter(projects::Column::Id.eq(id))
        .filter(projects::Column::Status.eq(from.as_str()))
        .exec(db)
        .await
        .map_err(|e| TkseError::database_operation(format!("更新项目状态失败: {e}")))?;
    if updated.rows_affected != 1 {
        return Err(TkseError::conflict(format!(
            "Project status changed concurrently, cannot transition from {from} to {next}"
        )));
    }

    for status in DeliverableStatus::all() {
        if let Some(to) = status.after_project_transition(next) {
            Deliverables::update_many()
                .col_expr(deliverables::Column::Status, Expr::value(to.as_str()))
                .col_expr(deliverables::Column::UpdatedAt, Expr::value(now))
                .filter(deliverables::Column::ProjectId.eq(id))
                .filter(deliverables::Column::Status.eq(status.as_str()))
                .exec(db)
                .await
                .map_err(|e| TkseError::database_operation(format!("更新交付物状态失败: {e}")))?;
        }
    }

    Ok(())
}

impl SeaOrmStorage {
    /// 发布项目：项目、交付物、任务、验收标准在同一事务中写入
    pub async fn publish_project_impl(
        &self,
        enterprise_id: Uuid,
        req: PublishProjectRequest,
    ) -> Result<ProjectDetail> {
        if req.name.trim().is_empty() {
            return Err(TkseError::validation("Project name is required"));
        }

        let enterprise = Enterprises::find_by_id(enterprise_id)
            .filter(enterprises::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询企业失败: {e}")))?;
        if enterprise.is_none() {
            return Err(TkseError::not_found("Enterprise not found"));
        }

        let technologies = serde_json::to_string(&req.technologies)?;
        let now = now_millis();
        let project_id = Uuid::new_v4();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TkseError::database_operation(format!("开启事务失败: {e}")))?;

        ProjectActiveModel {
            id: Set(project_id),
            enterprise_id: Set(enterprise_id),
            name: Set(req.name),
            description: Set(req.description),
            technologies: Set(technologies),
            complexity: Set(req.complexity),
            category: Set(req.category),
            score: Set(req.score),
            country: Set(req.country),
            blob_path: Set(req.blob_path),
            status: Set(ProjectStatus::Pending.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| TkseError::database_operation(format!("创建项目失败: {e}")))?;

        for deliverable in req.deliverables {
            let deliverable_id = Uuid::new_v4();
            DeliverableActiveModel {
                id: Set(deliverable_id),
                project_id: Set(project_id),
                name: Set(deliverable.name),
                status: Set(DeliverableStatus::InPlanning.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| TkseError::database_operation(format!("创建交付物失败: {e}")))?;

            for task in deliverable.tasks {
                let task_id = Uuid::new_v4();
                TaskActiveModel {
                    id: Set(task_id),
                    deliverable_id: Set(deliverable_id),
                    name: Set(task.name),
                    description: Set(task.description),
                    estimated_time: Set(task.estimated_time),
                    status: Set(TaskStatus::Pending.to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&txn)
                .await
                .map_err(|e| TkseError::database_operation(format!("创建任务失败: {e}")))?;

                for description in task.acceptance_criteria {
                    CriterionActiveModel {
                        id: Set(Uuid::new_v4()),
                        task_id: Set(task_id),
                        description: Set(description),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(&txn)
                    .await
                    .map_err(|e| {
                        TkseError::database_operation(format!("创建验收标准失败: {e}"))
                    })?;
                }
            }
        }

        txn.commit()
            .await
            .map_err(|e| TkseError::database_operation(format!("提交事务失败: {e}")))?;

        info!("Project {} published by enterprise {}", project_id, enterprise_id);

        self.get_project_impl(project_id)
            .await?
            .ok_or_else(|| TkseError::not_found("Project not found"))
    }

    /// 获取项目完整结构
    pub async fn get_project_impl(&self, id: Uuid) -> Result<Option<ProjectDetail>> {
        let project = Projects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询项目失败: {e}")))?;

        match project {
            Some(p) => Ok(load_project_details(&self.db, vec![p]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 分页列出项目
    pub async fn list_projects_with_pagination_impl(
        &self,
        query: ProjectListQuery,
    ) -> Result<ProjectListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = Projects::find();

        if let Some(ref status) = query.status {
            let status = status
                .parse::<ProjectStatus>()
                .map_err(TkseError::validation)?;
            select = select.filter(projects::Column::Status.eq(status.as_str()));
        }

        if let Some(enterprise_id) = query.enterprise_id {
            select = select.filter(projects::Column::EnterpriseId.eq(enterprise_id));
        }

        select = select.order_by_desc(projects::Column::CreatedAt);

        let (models, total) = match SearchTerm::parse(query.search.as_deref()) {
            Some(term) => {
                let candidates: Vec<(Uuid, String)> = select
                    .select_only()
                    .column(projects::Column::Id)
                    .column(projects::Column::Name)
                    .into_tuple()
                    .all(&self.db)
                    .await
                    .map_err(|e| TkseError::database_operation(format!("查询项目列表失败: {e}")))?;

                let ids: Vec<Uuid> = candidates
                    .into_iter()
                    .filter(|(_, name)| term.matches(name))
                    .map(|(id, _)| id)
                    .collect();

                let page_ids = page_of(&ids, page, size);
                let models = if page_ids.is_empty() {
                    Vec::new()
                } else {
                    Projects::find()
                        .filter(projects::Column::Id.is_in(page_ids.clone()))
                        .all(&self.db)
                        .await
                        .map_err(|e| {
                            TkseError::database_operation(format!("查询项目列表失败: {e}"))
                        })?
                };
                (order_by_ids(models, &page_ids, |m| m.id), ids.len() as u64)
            }
            None => {
                let paginator = select.paginate(&self.db, size);
                let total = paginator
                    .num_items()
                    .await
                    .map_err(|e| TkseError::database_operation(format!("查询项目总数失败: {e}")))?;
                let models = paginator
                    .fetch_page(page - 1)
                    .await
                    .map_err(|e| TkseError::database_operation(format!("查询项目列表失败: {e}")))?;
                (models, total)
            }
        };

        Ok(ProjectListResponse {
            items: load_project_details(&self.db, models).await?,
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 学生可浏览的项目
    pub async fn list_visible_projects_impl(&self) -> Result<Vec<ProjectDetail>> {
        let statuses: Vec<&str> = ProjectStatus::visible_statuses()
            .iter()
            .map(|s| s.as_str())
            .collect();

        let models = Projects::find()
            .filter(projects::Column::Status.is_in(statuses))
            .order_by_desc(projects::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询项目列表失败: {e}")))?;

        load_project_details(&self.db, models).await
    }

    /// 企业的全部项目
    pub async fn list_enterprise_projects_impl(
        &self,
        enterprise_id: Uuid,
    ) -> Result<Vec<ProjectDetail>> {
        let models = Projects::find()
            .filter(projects::Column::EnterpriseId.eq(enterprise_id))
            .order_by_desc(projects::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询项目列表失败: {e}")))?;

        load_project_details(&self.db, models).await
    }

    /// 更新项目描述性字段
    pub async fn update_project_impl(
        &self,
        id: Uuid,
        update: UpdateProjectRequest,
    ) -> Result<Option<ProjectDetail>> {
        let existing = Projects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询项目失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let mut model = ProjectActiveModel {
            id: Set(id),
            updated_at: Set(now_millis()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(TkseError::validation("Project name is required"));
            }
            model.name = Set(name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(technologies) = update.technologies {
            model.technologies = Set(serde_json::to_string(&technologies)?);
        }
        if let Some(complexity) = update.complexity {
            model.complexity = Set(Some(complexity));
        }
        if let Some(category) = update.category {
            model.category = Set(Some(category));
        }
        if let Some(score) = update.score {
            model.score = Set(Some(score));
        }
        if let Some(country) = update.country {
            model.country = Set(Some(country));
        }
        if let Some(blob_path) = update.blob_path {
            model.blob_path = Set(Some(blob_path));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("更新项目失败: {e}")))?;

        self.get_project_impl(id).await
    }

    /// 删除项目（级联删除交付物、任务、提交及学生关联）
    pub async fn delete_project_impl(&self, id: Uuid) -> Result<bool> {
        let result = Projects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("删除项目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 项目状态流转
    ///
    /// 校验流转表后在同一事务中写入项目状态并级联更新交付物：
    /// 进入 IN_PROGRESS 时规划中的交付物进入开发，进入 COMPLETED 时开发中的交付物完成。
    pub async fn transition_project_impl(
        &self,
        id: Uuid,
        next: ProjectStatus,
    ) -> Result<ProjectDetail> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TkseError::database_operation(format!("开启事务失败: {e}")))?;

        let project = Projects::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询项目失败: {e}")))?
            .ok_or_else(|| TkseError::not_found("Project not found"))?;

        let current = stored_project_status(&project)?;
        if !current.can_transition_to(next) {
            return Err(TkseError::conflict(format!(
                "Cannot transition from {current} to {next}"
            )));
        }

        apply_transition(&txn, id, current, next, now_millis()).await?;

        txn.commit()
            .await
            .map_err(|e| TkseError::database_operation(format!("提交事务失败: {e}")))?;

        info!("Project {} transitioned {} -> {}", id, current, next);

        self.get_project_impl(id)
            .await?
            .ok_or_else(|| TkseError::not_found("Project not found"))
    }

    /// 学生加入项目
    pub async fn join_project_impl(
        &self,
        student_id: Uuid,
        project_id: Uuid,
    ) -> Result<StudentProject> {
        let student = Students::find_by_id(student_id)
            .filter(students::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询学生失败: {e}")))?;
        if student.is_none() {
            return Err(TkseError::not_found("Student not found"));
        }

        let project = Projects::find_by_id(project_id)
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询项目失败: {e}")))?
            .ok_or_else(|| TkseError::not_found("Project not found"))?;

        let status = stored_project_status(&project)?;
        if !status.accepts_students() {
            return Err(TkseError::conflict(format!(
                "Project is not accepting students (status {status})"
            )));
        }

        let existing = StudentProjects::find()
            .filter(student_projects::Column::StudentId.eq(student_id))
            .filter(student_projects::Column::ProjectId.eq(project_id))
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询学生项目失败: {e}")))?;
        if existing.is_some() {
            return Err(TkseError::conflict("Student already joined this project"));
        }

        let now = now_millis();
        let result = StudentProjectActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            project_id: Set(project_id),
            joined_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_write_err(e, "Student already joined this project", "加入项目失败"))?;

        Ok(result.into_student_project())
    }

    /// 学生加入的项目 ID 及加入时间
    pub(super) async fn student_links(&self, student_id: Uuid) -> Result<Vec<student_projects::Model>> {
        let student = Students::find_by_id(student_id)
            .filter(students::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询学生失败: {e}")))?;
        if student.is_none() {
            return Err(TkseError::not_found("Student not found"));
        }

        StudentProjects::find()
            .filter(student_projects::Column::StudentId.eq(student_id))
            .order_by_desc(student_projects::Column::JoinedAt)
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询学生项目失败: {e}")))
    }

    /// 学生已加入的项目
    pub async fn list_student_projects_impl(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<StudentProjectItem>> {
        let links = self.student_links(student_id).await?;
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = links.iter().map(|l| l.project_id).collect();
        let models = Projects::find()
            .filter(projects::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询项目列表失败: {e}")))?;

        let mut details: HashMap<Uuid, ProjectDetail> = load_project_details(&self.db, models)
            .await?
            .into_iter()
            .map(|p| (p.project.id, p))
            .collect();

        Ok(links
            .into_iter()
            .filter_map(|l| {
                details.remove(&l.project_id).map(|project| StudentProjectItem {
                    project,
                    joined_at: from_millis(l.joined_at),
                })
            })
            .collect())
    }

    /// 学生所在项目的全部交付物
    pub async fn list_student_deliverables_impl(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<DeliverableDetail>> {
        let links = self.student_links(student_id).await?;
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = links.iter().map(|l| l.project_id).collect();
        let models = Deliverables::find()
            .filter(deliverables::Column::ProjectId.is_in(ids))
            .order_by_asc(deliverables::Column::CreatedAt)
            .order_by_asc(deliverables::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询交付物失败: {e}")))?;

        load_deliverable_details(&self.db, models).await
    }
}
