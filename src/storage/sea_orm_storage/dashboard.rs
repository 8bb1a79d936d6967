use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::deliverables::{self, Entity as Deliverables};
use crate::entity::projects::{self, Entity as Projects};
use crate::entity::student_projects::{self, Entity as StudentProjects};
use crate::entity::students::{self, Entity as Students};
use crate::entity::tasks::{self, Entity as Tasks};
use crate::errors::{Result, TkseError};
use crate::models::dashboard::responses::{
    DeliveriesSeries, EnterpriseDashboardSummary, StudentDashboard,
};
use crate::models::projects::entities::{DeliverableStatus, ProjectStatus, TaskStatus};
use crate::utils::time::from_millis;
use chrono::{Datelike, TimeZone, Utc};
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use uuid::Uuid;

/// 某年的毫秒时间范围 [start, end)
fn year_range_millis(year: i32) -> Result<(i64, i64)> {
    let start = Utc
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| TkseError::validation(format!("Invalid year: {year}")))?;
    let end = Utc
        .with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| TkseError::validation(format!("Invalid year: {year}")))?;
    Ok((start.timestamp_millis(), end.timestamp_millis()))
}

fn active_statuses() -> Vec<&'static str> {
    ProjectStatus::visible_statuses()
        .iter()
        .map(|s| s.as_str())
        .collect()
}

impl SeaOrmStorage {
    /// 企业首页统计
    pub async fn enterprise_dashboard_summary_impl(
        &self,
        enterprise_id: Uuid,
    ) -> Result<EnterpriseDashboardSummary> {
        // 已发布项目中的待处理任务，兼容旧版标签
        let pending_tasks = Tasks::find()
            .join(JoinType::InnerJoin, tasks::Relation::Deliverable.def())
            .join(JoinType::InnerJoin, deliverables::Relation::Project.def())
            .filter(projects::Column::EnterpriseId.eq(enterprise_id))
            .filter(projects::Column::Status.ne(ProjectStatus::Pending.as_str()))
            .filter(tasks::Column::Status.is_in([TaskStatus::Pending.as_str(), "Pendente"]))
            .count(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("统计待处理任务失败: {e}")))?;

        let active_projects = Projects::find()
            .filter(projects::Column::EnterpriseId.eq(enterprise_id))
            .filter(projects::Column::Status.is_in(active_statuses()))
            .count(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("统计活跃项目失败: {e}")))?;

        let student_ids: Vec<Uuid> = StudentProjects::find()
            .join(JoinType::InnerJoin, student_projects::Relation::Project.def())
            .filter(projects::Column::EnterpriseId.eq(enterprise_id))
            .filter(projects::Column::Status.is_in(active_statuses()))
            .select_only()
            .column(student_projects::Column::StudentId)
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("统计学生数失败: {e}")))?;

        Ok(EnterpriseDashboardSummary {
            pending_tasks: pending_tasks as i64,
            active_projects: active_projects as i64,
            students: student_ids.len() as i64,
        })
    }

    /// 按项目、按月统计当年完成的交付物
    pub async fn deliveries_per_project_impl(
        &self,
        enterprise_id: Uuid,
        project_ids: Option<Vec<Uuid>>,
        year: i32,
    ) -> Result<Vec<DeliveriesSeries>> {
        let (start, end) = year_range_millis(year)?;

        let mut select = Projects::find().filter(projects::Column::EnterpriseId.eq(enterprise_id));
        if let Some(ids) = project_ids
            && !ids.is_empty()
        {
            select = select.filter(projects::Column::Id.is_in(ids));
        }
        let project_models = select
            .order_by_asc(projects::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询项目列表失败: {e}")))?;
        if project_models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = project_models.iter().map(|p| p.id).collect();
        let completed = Deliverables::find()
            .filter(deliverables::Column::ProjectId.is_in(ids))
            .filter(deliverables::Column::Status.eq(DeliverableStatus::Completed.as_str()))
            .filter(deliverables::Column::UpdatedAt.gte(start))
            .filter(deliverables::Column::UpdatedAt.lt(end))
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询交付物失败: {e}")))?;

        let mut counts: HashMap<Uuid, [i64; 12]> = HashMap::new();
        for d in completed {
            let month = from_millis(d.updated_at).month0() as usize;
            counts.entry(d.project_id).or_insert([0; 12])[month] += 1;
        }

        Ok(project_models
            .into_iter()
            .map(|p| {
                let monthly = counts.remove(&p.id).unwrap_or([0; 12]);
                DeliveriesSeries::from_monthly(p.name, monthly)
            })
            .collect())
    }

    /// 学生首页统计
    pub async fn student_dashboard_impl(&self, student_id: Uuid) -> Result<StudentDashboard> {
        let student = Students::find_by_id(student_id)
            .filter(students::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询学生失败: {e}")))?;
        if student.is_none() {
            return Err(TkseError::not_found("Student not found"));
        }

        let project_ids: Vec<Uuid> = StudentProjects::find()
            .filter(student_projects::Column::StudentId.eq(student_id))
            .select_only()
            .column(student_projects::Column::ProjectId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询学生项目失败: {e}")))?;

        if project_ids.is_empty() {
            return Ok(StudentDashboard {
                completed_tasks: 0,
                in_progress_tasks: 0,
                total_deliverables: 0,
                certificate: 0,
            });
        }

        let total_deliverables = Deliverables::find()
            .filter(deliverables::Column::ProjectId.is_in(project_ids.clone()))
            .count(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("统计交付物失败: {e}")))?;

        let task_statuses: Vec<String> = Tasks::find()
            .join(JoinType::InnerJoin, tasks::Relation::Deliverable.def())
            .filter(deliverables::Column::ProjectId.is_in(project_ids))
            .select_only()
            .column(tasks::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| TkseError::database_operation(format!("查询任务失败: {e}")))?;

        let completed_tasks = task_statuses
            .iter()
            .filter(|s| TaskStatus::from_stored(s) == TaskStatus::Approved)
            .count() as i64;

        Ok(StudentDashboard {
            completed_tasks,
            in_progress_tasks: task_statuses.len() as i64 - completed_tasks,
            total_deliverables: total_deliverables as i64,
            certificate: 0,
        })
    }
}
