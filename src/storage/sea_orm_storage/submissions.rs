use std::collections::{HashMap, HashSet};

use super::projects::load_deliverable_details;
use super::{SeaOrmStorage, map_write_err};
use crate::entity::deliverables::{self, Entity as Deliverables};
use crate::entity::enterprises::{self, Entity as Enterprises};
use crate::entity::projects::{self, Entity as Projects};
use crate::entity::students::{self, Entity as Students};
use crate::entity::task_submissions::{
    self, ActiveModel as SubmissionActiveModel, Entity as TaskSubmissions,
};
use crate::entity::tasks::{self, Entity as Tasks};
use crate::errors::{Result, TkseError};
use crate::models::{
    PaginationInfo,
    enterprises::entities::EnterpriseSummary,
    projects::entities::{DeliverableStatus, TaskStatus},
    students::entities::StudentSummary,
    submissions::{
        entities::{
            ALREADY_APPROVED, ALREADY_PENDING, SubmissionStatus, TaskSubmission, pending_key,
        },
        requests::{CreateSubmissionRequest, SubmissionReviewQuery},
        responses::{
            ProjectSummary, ReviewSubmissionItem, StudentSubmissionItem,
            SubmissionReviewListResponse, TaskSummary,
        },
    },
};
use crate::utils::search::{SearchTerm, order_by_ids, page_of};
use crate::utils::time::now_millis;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;


/// 设置任务状态
async fn set_task_status<C: ConnectionTrait>(
    db: &C,
    task_id: Uuid,
    status: TaskStatus,
    now: i64,
) -> Result<()> {
    Tasks::update_many()
        .col_expr(tasks::Column::Status, Expr::value(status.as_str()))
        .col_expr(tasks::Column::UpdatedAt, Expr::value(now))
        .filter(tasks::Column::Id.eq(task_id))
        .exec(db)
        .await
        .map_err(|e| TkseError::database_operation(format!("更新任务状态失败: {e}")))?;
    Ok(())
}

/// 设置交付物状态
async fn set_deliverable_status<C: ConnectionTrait>(
    db: &C,
    deliverable_id: Uuid,
    status: DeliverableStatus,
    now: i64,
) -> Result<()> {
    Deliverables::update_many()
        .col_expr(deliverables::Column::Status, Expr::value(status.as_str()))
        .col_expr(deliverables::Column::UpdatedAt, Expr::value(now))
        .filter(deliverables::Column::Id.eq(deliverable_id))
        .exec(db)
        .await
        .map_err(|e| TkseError::database_operation(format!("更新交付物状态失败: {e}")))?;
    Ok(())
}

impl SeaOrmStorage {
    /// 创建提交
    ///
    /// 根据 (task, student) 最近一次提交决定行为：
    /// 无提交时新建，被驳回时覆盖原记录重新进入待审，待审或已通过时拒绝。
    pub async fn create_submission_impl(
        &self,
        student_id: Uuid,
        req: CreateSubmissionRequest,
    ) -> Result<TaskSubmission> {
        if req.submission_link.trim().is_empty() {
            return Err(TkseError::validation("Submission link is required"));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TkseError::database_operation(format!("开启事务失败: {e}")))?;

        let task = Tasks::find_by_id(req.task_id)
            .one(&txn)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询任务失败: {e}")))?
            .ok_or_else(|| TkseError::not_found("Task not found"))?;

        let student = Students::find_by_id(student_id)
            .filter(students::Column::IsActive.eq(true))
            .one(&txn)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询学生失败: {e}")))?;
        if student.is_none() {
            return Err(TkseError::not_found("Student not found"));
        }

        let latest = TaskSubmissions::find()
            .filter(task_submissions::Column::TaskId.eq(task.id))
            .filter(task_submissions::Column::StudentId.eq(student_id))
            .order_by_desc(task_submissions::Column::SubmittedAt)
            .one(&txn)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询提交失败: {e}")))?;

        let now = now_millis();
        let key = pending_key(task.id, student_id);

        let saved = match latest {
            None => SubmissionActiveModel {
                id: Set(Uuid::new_v4()),
                task_id: Set(task.id),
                student_id: Set(student_id),
                validated_by: Set(None),
                submission_link: Set(req.submission_link),
                branch_name: Set(req.branch_name),
                evidence_file: Set(req.evidence_file),
                status: Set(SubmissionStatus::Pending.to_string()),
                feedback: Set(None),
                pending_key: Set(Some(key)),
                submitted_at: Set(now),
                validated_at: Set(None),
            }
            .insert(&txn)
            .await
            .map_err(|e| map_write_err(e, ALREADY_PENDING, "创建提交失败"))?,
            Some(previous) => match previous.status.parse::<SubmissionStatus>() {
                Ok(SubmissionStatus::Rejected) => {
                    let mut model: SubmissionActiveModel = previous.into();
                    model.submission_link = Set(req.submission_link);
                    model.branch_name = Set(req.branch_name);
                    model.evidence_file = Set(req.evidence_file);
                    model.status = Set(SubmissionStatus::Pending.to_string());
                    model.feedback = Set(Some(String::new()));
                    model.validated_by = Set(None);
                    model.validated_at = Set(None);
                    model.pending_key = Set(Some(key));
                    model.submitted_at = Set(now);
                    model
                        .update(&txn)
                        .await
                        .map_err(|e| map_write_err(e, ALREADY_PENDING, "更新提交失败"))?
                }
                Ok(SubmissionStatus::Approved) => {
                    return Err(TkseError::conflict(ALREADY_APPROVED));
                }
                Ok(SubmissionStatus::Pending) => return Err(TkseError::conflict(ALREADY_PENDING)),
                Err(e) => {
                    return Err(TkseError::database_operation(format!(
                        "提交 {} 的状态无法识别: {e}",
                        previous.id
                    )));
                }
            },
        };

        set_task_status(&txn, task.id, TaskStatus::Pending, now).await?;
        set_deliverable_status(&txn, task.deliverable_id, DeliverableStatus::InDevelopment, now)
            .await?;

        txn.commit()
            .await
            .map_err(|e| map_write_err(e, ALREADY_PENDING, "提交事务失败"))?;

        info!(
            "Submission {} created for task {} by student {}",
            saved.id, saved.task_id, student_id
        );

        Ok(saved.into_submission())
    }

    /// 审核提交
    ///
    /// 事务内写入审核结论并同步任务状态，驳回时交付物回到开发中；
    /// 提交后若交付物下所有任务均已通过，则交付物完成。
    pub async fn validate_submission_impl(
        &self,
        submission_id: Uuid,
        validator_id: Uuid,
        decision: &str,
        feedback: Option<String>,
    ) -> Result<TaskSubmission> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TkseError::database_operation(format!("开启事务失败: {e}")))?;

        let validator = Enterprises::find_by_id(validator_id)
            .filter(enterprises::Column::IsActive.eq(true))
            .one(&txn)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询企业失败: {e}")))?;
        if validator.is_none() {
            return Err(TkseError::not_found("Validator not found"));
        }

        let submission = TaskSubmissions::find_by_id(submission_id)
            .one(&txn)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询提交失败: {e}")))?
            .ok_or_else(|| TkseError::not_found("Submission not found"))?;

        let decision = SubmissionStatus::parse_decision(decision)
            .ok_or_else(|| TkseError::validation("Status must be APPROVED or REJECTED"))?;

        let task = Tasks::find_by_id(submission.task_id)
            .one(&txn)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询任务失败: {e}")))?
            .ok_or_else(|| TkseError::not_found("Task not found"))?;

        let now = now_millis();
        let mut model: SubmissionActiveModel = submission.into();
        model.status = Set(decision.to_string());
        model.feedback = Set(feedback);
        model.validated_by = Set(Some(validator_id));
        model.validated_at = Set(Some(now));
        model.pending_key = Set(None);
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| TkseError::database_operation(format!("更新提交失败: {e}")))?;

        set_task_status(&txn, task.id, decision.as_task_status(), now).await?;
        if decision == SubmissionStatus::Rejected {
            set_deliverable_status(&txn, task.deliverable_id, DeliverableStatus::InDevelopment, now)
                .await?;
        }

        txn.commit()
            .await
            .map_err(|e| TkseError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "Submission {} {} by enterprise {}",
            updated.id, decision, validator_id
        );

        self.complete_deliverable_if_done(task.deliverable_id)
            .await?;

        Ok(updated.into_submission())
    }

    /// 交付物下全部任务通过时标记完成
    async fn complete_deliverable_if_done(&self, deliverable_id: Uuid) -> Result<bool> {
        let task_models = Tasks::find()
            .filter(tasks::Column::DeliverableId.eq(deliverable_id))
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询任务失败: {e}")))?;

        let all_approved = task_models
            .iter()
            .all(|t| TaskStatus::from_stored(&t.status) == TaskStatus::Approved);
        if !all_approved {
            return Ok(false);
        }

        set_deliverable_status(
            &self.db,
            deliverable_id,
            DeliverableStatus::Completed,
            now_millis(),
        )
        .await?;
        debug!("Deliverable {} completed", deliverable_id);
        Ok(true)
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_impl(&self, id: Uuid) -> Result<Option<TaskSubmission>> {
        let result = TaskSubmissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 提交所属项目的企业
    pub async fn get_submission_owner_impl(&self, submission_id: Uuid) -> Result<Option<Uuid>> {
        TaskSubmissions::find_by_id(submission_id)
            .join(JoinType::InnerJoin, task_submissions::Relation::Task.def())
            .join(JoinType::InnerJoin, tasks::Relation::Deliverable.def())
            .join(JoinType::InnerJoin, deliverables::Relation::Project.def())
            .select_only()
            .column(projects::Column::EnterpriseId)
            .into_tuple::<Uuid>()
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询提交所属企业失败: {e}")))
    }

    /// 企业待审核提交列表
    pub async fn list_submissions_for_review_impl(
        &self,
        enterprise_id: Uuid,
        query: SubmissionReviewQuery,
    ) -> Result<SubmissionReviewListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = TaskSubmissions::find()
            .join(JoinType::InnerJoin, task_submissions::Relation::Task.def())
            .join(JoinType::InnerJoin, tasks::Relation::Deliverable.def())
            .join(JoinType::InnerJoin, deliverables::Relation::Project.def())
            .join(JoinType::InnerJoin, task_submissions::Relation::Student.def())
            .filter(projects::Column::EnterpriseId.eq(enterprise_id));

        if let Some(project_id) = query.project_id {
            select = select.filter(projects::Column::Id.eq(project_id));
        }

        if let Some(ref status) = query.status
            && !status.is_empty()
        {
            let status = status
                .parse::<SubmissionStatus>()
                .map_err(TkseError::validation)?;
            select = select.filter(task_submissions::Column::Status.eq(status.to_string()));
        }

        select = select.order_by_desc(task_submissions::Column::SubmittedAt);

        let (submissions, total) = match SearchTerm::parse(query.search.as_deref()) {
            // 按学生名、交付物名、任务名搜索
            Some(term) => {
                let candidates: Vec<(Uuid, String, String, String)> = select
                    .select_only()
                    .column(task_submissions::Column::Id)
                    .column_as(students::Column::Name, "student_name")
                    .column_as(deliverables::Column::Name, "deliverable_name")
                    .column_as(tasks::Column::Name, "task_name")
                    .into_tuple()
                    .all(&self.db)
                    .await
                    .map_err(|e| TkseError::database_operation(format!("查询提交列表失败: {e}")))?;

                let ids: Vec<Uuid> = candidates
                    .into_iter()
                    .filter(|(_, student, deliverable, task)| {
                        term.matches_any([student.as_str(), deliverable.as_str(), task.as_str()])
                    })
                    .map(|(id, ..)| id)
                    .collect();

                let page_ids = page_of(&ids, page, size);
                let models = if page_ids.is_empty() {
                    Vec::new()
                } else {
                    TaskSubmissions::find()
                        .filter(task_submissions::Column::Id.is_in(page_ids.clone()))
                        .all(&self.db)
                        .await
                        .map_err(|e| {
                            TkseError::database_operation(format!("查询提交列表失败: {e}"))
                        })?
                };
                (order_by_ids(models, &page_ids, |m| m.id), ids.len() as u64)
            }
            None => {
                let paginator = select.paginate(&self.db, size);
                let total = paginator
                    .num_items()
                    .await
                    .map_err(|e| TkseError::database_operation(format!("查询提交总数失败: {e}")))?;
                let models = paginator
                    .fetch_page(page - 1)
                    .await
                    .map_err(|e| TkseError::database_operation(format!("查询提交列表失败: {e}")))?;
                (models, total)
            }
        };

        let items = self.build_review_items(submissions).await?;

        Ok(SubmissionReviewListResponse {
            items,
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 为提交附加学生、任务、交付物、项目信息
    async fn build_review_items(
        &self,
        submissions: Vec<task_submissions::Model>,
    ) -> Result<Vec<ReviewSubmissionItem>> {
        if submissions.is_empty() {
            return Ok(Vec::new());
        }

        let task_ids: HashSet<Uuid> = submissions.iter().map(|s| s.task_id).collect();
        let student_ids: HashSet<Uuid> = submissions.iter().map(|s| s.student_id).collect();

        let task_models = Tasks::find()
            .filter(tasks::Column::Id.is_in(task_ids))
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询任务失败: {e}")))?;

        let deliverable_ids: HashSet<Uuid> = task_models.iter().map(|t| t.deliverable_id).collect();
        let deliverable_models = Deliverables::find()
            .filter(deliverables::Column::Id.is_in(deliverable_ids))
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询交付物失败: {e}")))?;

        let project_ids: HashSet<Uuid> =
            deliverable_models.iter().map(|d| d.project_id).collect();
        let projects: HashMap<Uuid, ProjectSummary> = Projects::find()
            .filter(projects::Column::Id.is_in(project_ids))
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询项目失败: {e}")))?
            .into_iter()
            .map(|m| {
                let p = m.into_project();
                (
                    p.id,
                    ProjectSummary {
                        id: p.id,
                        name: p.name,
                        status: p.status,
                    },
                )
            })
            .collect();

        let deliverables: HashMap<Uuid, _> = load_deliverable_details(&self.db, deliverable_models)
            .await?
            .into_iter()
            .map(|d| (d.deliverable.id, d))
            .collect();

        let tasks: HashMap<Uuid, TaskSummary> = task_models
            .into_iter()
            .map(|m| {
                let t = m.into_task();
                (t.id, TaskSummary::from(&t))
            })
            .collect();
        let task_deliverable: HashMap<Uuid, Uuid> = deliverables
            .values()
            .flat_map(|d| d.tasks.iter().map(|t| (t.task.id, d.deliverable.id)))
            .collect();

        // 学生可能已停用，摘要中仍保留
        let students: HashMap<Uuid, StudentSummary> = Students::find()
            .filter(students::Column::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询学生失败: {e}")))?
            .into_iter()
            .map(|m| {
                let s = m.into_student();
                (s.id, StudentSummary::from(&s))
            })
            .collect();

        Ok(submissions
            .into_iter()
            .filter_map(|s| {
                let task = tasks.get(&s.task_id)?.clone();
                let deliverable = deliverables
                    .get(task_deliverable.get(&s.task_id)?)?
                    .clone();
                let project = projects.get(&deliverable.deliverable.project_id)?.clone();
                let student = students.get(&s.student_id)?.clone();
                Some(ReviewSubmissionItem {
                    submission: s.into_submission(),
                    student,
                    task,
                    deliverable,
                    project,
                })
            })
            .collect())
    }

    /// 学生自己的提交记录
    pub async fn list_student_submissions_impl(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<StudentSubmissionItem>> {
        let student = Students::find_by_id(student_id)
            .filter(students::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询学生失败: {e}")))?;
        if student.is_none() {
            return Err(TkseError::not_found("Student not found"));
        }

        let submissions = TaskSubmissions::find()
            .filter(task_submissions::Column::StudentId.eq(student_id))
            .order_by_desc(task_submissions::Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询提交列表失败: {e}")))?;
        if submissions.is_empty() {
            return Ok(Vec::new());
        }

        let task_ids: HashSet<Uuid> = submissions.iter().map(|s| s.task_id).collect();
        let validator_ids: HashSet<Uuid> =
            submissions.iter().filter_map(|s| s.validated_by).collect();

        let tasks: HashMap<Uuid, TaskSummary> = Tasks::find()
            .filter(tasks::Column::Id.is_in(task_ids))
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询任务失败: {e}")))?
            .into_iter()
            .map(|m| {
                let t = m.into_task();
                (t.id, TaskSummary::from(&t))
            })
            .collect();

        let validators: HashMap<Uuid, EnterpriseSummary> = if validator_ids.is_empty() {
            HashMap::new()
        } else {
            Enterprises::find()
                .filter(enterprises::Column::Id.is_in(validator_ids))
                .all(&self.db)
                .await
                .map_err(|e| TkseError::database_operation(format!("查询企业失败: {e}")))?
                .into_iter()
                .map(|m| {
                    let e = m.into_enterprise();
                    (e.id, EnterpriseSummary::from(&e))
                })
                .collect()
        };

        Ok(submissions
            .into_iter()
            .filter_map(|s| {
                let task = tasks.get(&s.task_id)?.clone();
                let validator = s.validated_by.and_then(|id| validators.get(&id).cloned());
                Some(StudentSubmissionItem {
                    submission: s.into_submission(),
                    task,
                    validator,
                })
            })
            .collect())
    }
}
