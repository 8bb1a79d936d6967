use std::time::Duration;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::projects::apply_transition;
use super::{SeaOrmStorage, map_write_err};
use crate::entity::projects::{self, Entity as Projects};
use crate::entity::task_submissions::ActiveModel as SubmissionActiveModel;
use crate::errors::TkseError;
use crate::models::PaginationQuery;
use crate::models::auth::AccountType;
use crate::models::enterprises::entities::Enterprise;
use crate::models::projects::entities::{
    DeliverableStatus, ProjectDetail, ProjectStatus, TaskStatus,
};
use crate::models::projects::requests::{
    ProjectListQuery, PublishDeliverable, PublishProjectRequest, PublishTask,
};
use crate::models::students::entities::Student;
use crate::models::students::requests::StudentListQuery;
use crate::models::submissions::entities::{
    ALREADY_PENDING, SubmissionStatus, TaskSubmission, pending_key,
};
use crate::models::submissions::requests::{CreateSubmissionRequest, SubmissionReviewQuery};
use crate::storage::Storage;
use crate::utils::time::now_millis;

// 单连接内存库，连接池中的每个连接都是独立数据库
async fn storage() -> SeaOrmStorage {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    SeaOrmStorage::from_connection(db).await.unwrap()
}

async fn seed_enterprise(storage: &SeaOrmStorage, email: &str) -> Enterprise {
    let req = serde_json::from_value(serde_json::json!({
        "name": "Acme",
        "email": email,
        "password": "hashed",
    }))
    .unwrap();
    storage.create_enterprise(req).await.unwrap()
}

async fn seed_student(storage: &SeaOrmStorage, name: &str, email: &str) -> Student {
    let req = serde_json::from_value(serde_json::json!({
        "name": name,
        "email": email,
        "password": "hashed",
    }))
    .unwrap();
    storage.create_student(req).await.unwrap()
}

/// 每个元素为 (交付物名, 任务名列表)
fn draft(name: &str, deliverables: &[(&str, &[&str])]) -> PublishProjectRequest {
    PublishProjectRequest {
        name: name.to_string(),
        description: Some("Generated project".to_string()),
        technologies: vec!["Rust".to_string()],
        complexity: None,
        category: None,
        score: None,
        country: None,
        blob_path: None,
        deliverables: deliverables
            .iter()
            .map(|(deliverable, tasks)| PublishDeliverable {
                name: deliverable.to_string(),
                tasks: tasks
                    .iter()
                    .map(|task| PublishTask {
                        name: task.to_string(),
                        description: None,
                        estimated_time: Some(2.0),
                        acceptance_criteria: vec![format!("{task} works")],
                    })
                    .collect(),
            })
            .collect(),
    }
}

async fn publish_in(
    storage: &SeaOrmStorage,
    enterprise_id: Uuid,
    req: PublishProjectRequest,
    path: &[ProjectStatus],
) -> ProjectDetail {
    let mut project = storage.publish_project(enterprise_id, req).await.unwrap();
    for next in path {
        project = storage
            .transition_project(project.project.id, *next)
            .await
            .unwrap();
    }
    project
}

fn task_id(project: &ProjectDetail, deliverable: usize, task: usize) -> Uuid {
    project.deliverables[deliverable].tasks[task].task.id
}

async fn submit(storage: &SeaOrmStorage, student_id: Uuid, task_id: Uuid) -> TaskSubmission {
    storage
        .create_submission(
            student_id,
            CreateSubmissionRequest {
                task_id,
                submission_link: "https://github.com/ana/repo".to_string(),
                branch_name: Some("main".to_string()),
                evidence_file: None,
            },
        )
        .await
        .unwrap()
}

async fn reload(storage: &SeaOrmStorage, project_id: Uuid) -> ProjectDetail {
    storage.get_project(project_id).await.unwrap().unwrap()
}

#[actix_web::test]
async fn test_publish_creates_pending_tree() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;

    let project = storage
        .publish_project(
            enterprise.id,
            draft("Portal", &[("Backend", &["API", "DB"]), ("Frontend", &["UI"])]),
        )
        .await
        .unwrap();

    assert_eq!(project.project.status, ProjectStatus::Pending);
    assert_eq!(project.project.technologies, vec!["Rust".to_string()]);
    assert_eq!(project.deliverables.len(), 2);
    assert_eq!(project.progress, 0);
    for deliverable in &project.deliverables {
        assert_eq!(deliverable.deliverable.status, DeliverableStatus::InPlanning);
        for task in &deliverable.tasks {
            assert_eq!(task.task.status, TaskStatus::Pending);
            assert_eq!(task.acceptance_criteria.len(), 1);
        }
    }
}

#[actix_web::test]
async fn test_publish_requires_existing_enterprise() {
    let storage = storage().await;
    let err = storage
        .publish_project(Uuid::new_v4(), draft("Orphan", &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::NotFound(_)));
}

#[actix_web::test]
async fn test_transition_cascades_to_deliverables() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;
    let project = publish_in(
        &storage,
        enterprise.id,
        draft("Portal", &[("Backend", &["API"])]),
        &[ProjectStatus::Open],
    )
    .await;
    assert_eq!(project.project.status, ProjectStatus::Open);
    assert_eq!(
        project.deliverables[0].deliverable.status,
        DeliverableStatus::InPlanning
    );

    let project = storage
        .transition_project(project.project.id, ProjectStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(
        project.deliverables[0].deliverable.status,
        DeliverableStatus::InDevelopment
    );

    let project = storage
        .transition_project(project.project.id, ProjectStatus::Completed)
        .await
        .unwrap();
    assert_eq!(project.project.status, ProjectStatus::Completed);
    assert_eq!(
        project.deliverables[0].deliverable.status,
        DeliverableStatus::Completed
    );
}

#[actix_web::test]
async fn test_invalid_transition_leaves_project_untouched() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;
    let project = publish_in(
        &storage,
        enterprise.id,
        draft("Portal", &[("Backend", &["API"])]),
        &[],
    )
    .await;

    let err = storage
        .transition_project(project.project.id, ProjectStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::Conflict(_)));

    let project = reload(&storage, project.project.id).await;
    assert_eq!(project.project.status, ProjectStatus::Pending);
    assert_eq!(
        project.deliverables[0].deliverable.status,
        DeliverableStatus::InPlanning
    );

    let err = storage
        .transition_project(Uuid::new_v4(), ProjectStatus::Open)
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::NotFound(_)));
}

#[actix_web::test]
async fn test_cancelled_project_is_terminal() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;
    let project = publish_in(
        &storage,
        enterprise.id,
        draft("Portal", &[]),
        &[ProjectStatus::Open, ProjectStatus::Cancelled],
    )
    .await;

    let err = storage
        .transition_project(project.project.id, ProjectStatus::Open)
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::Conflict(_)));
}

#[actix_web::test]
async fn test_join_project_rules() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;
    let student = seed_student(&storage, "Ana", "ana@example.com").await;

    let pending = publish_in(&storage, enterprise.id, draft("Draft", &[]), &[]).await;
    let err = storage
        .join_project(student.id, pending.project.id)
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::Conflict(_)));

    let open = publish_in(
        &storage,
        enterprise.id,
        draft("Open", &[("Backend", &["API"])]),
        &[ProjectStatus::Open],
    )
    .await;
    let link = storage
        .join_project(student.id, open.project.id)
        .await
        .unwrap();
    assert_eq!(link.project_id, open.project.id);

    let err = storage
        .join_project(student.id, open.project.id)
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::Conflict(_)));

    let projects = storage.list_student_projects(student.id).await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].project.project.id, open.project.id);

    let deliverables = storage.list_student_deliverables(student.id).await.unwrap();
    assert_eq!(deliverables.len(), 1);
    assert_eq!(deliverables[0].deliverable.name, "Backend");
}

#[actix_web::test]
async fn test_visible_projects_exclude_pending_and_closed() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;
    publish_in(&storage, enterprise.id, draft("Draft", &[]), &[]).await;
    let open = publish_in(
        &storage,
        enterprise.id,
        draft("Open", &[]),
        &[ProjectStatus::Open],
    )
    .await;
    publish_in(
        &storage,
        enterprise.id,
        draft("Cancelled", &[]),
        &[ProjectStatus::Cancelled],
    )
    .await;

    let visible = storage.list_visible_projects().await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].project.id, open.project.id);
}

#[actix_web::test]
async fn test_submission_moves_task_and_deliverable() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;
    let student = seed_student(&storage, "Ana", "ana@example.com").await;
    let project = publish_in(
        &storage,
        enterprise.id,
        draft("Portal", &[("Backend", &["API"])]),
        &[ProjectStatus::Open],
    )
    .await;

    let submission = submit(&storage, student.id, task_id(&project, 0, 0)).await;
    assert_eq!(submission.status, SubmissionStatus::Pending);
    assert!(submission.validated_by.is_none());

    let project = reload(&storage, project.project.id).await;
    assert_eq!(
        project.deliverables[0].deliverable.status,
        DeliverableStatus::InDevelopment
    );
    assert_eq!(
        project.deliverables[0].tasks[0].task.status,
        TaskStatus::Pending
    );

    let err = storage
        .create_submission(
            student.id,
            CreateSubmissionRequest {
                task_id: task_id(&project, 0, 0),
                submission_link: "https://github.com/ana/other".to_string(),
                branch_name: None,
                evidence_file: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::Conflict(_)));

    let owner = storage.get_submission_owner(submission.id).await.unwrap();
    assert_eq!(owner, Some(enterprise.id));
}

#[actix_web::test]
async fn test_submission_validation_errors() {
    let storage = storage().await;
    let student = seed_student(&storage, "Ana", "ana@example.com").await;

    let err = storage
        .create_submission(
            student.id,
            CreateSubmissionRequest {
                task_id: Uuid::new_v4(),
                submission_link: "  ".to_string(),
                branch_name: None,
                evidence_file: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::Validation(_)));

    let err = storage
        .create_submission(
            student.id,
            CreateSubmissionRequest {
                task_id: Uuid::new_v4(),
                submission_link: "https://github.com/ana/repo".to_string(),
                branch_name: None,
                evidence_file: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::NotFound(_)));
}

#[actix_web::test]
async fn test_deliverable_completes_after_last_approval() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;
    let student = seed_student(&storage, "Ana", "ana@example.com").await;
    let project = publish_in(
        &storage,
        enterprise.id,
        draft("Portal", &[("Backend", &["API", "DB"])]),
        &[ProjectStatus::Open, ProjectStatus::InProgress],
    )
    .await;

    let first = submit(&storage, student.id, task_id(&project, 0, 0)).await;
    let second = submit(&storage, student.id, task_id(&project, 0, 1)).await;

    let approved = storage
        .validate_submission(first.id, enterprise.id, "APPROVED", Some("ok".to_string()))
        .await
        .unwrap();
    assert_eq!(approved.status, SubmissionStatus::Approved);
    assert_eq!(approved.validated_by, Some(enterprise.id));
    assert!(approved.validated_at.is_some());

    let detail = reload(&storage, project.project.id).await;
    assert_eq!(
        detail.deliverables[0].deliverable.status,
        DeliverableStatus::InDevelopment
    );
    assert_eq!(detail.progress, 0);

    storage
        .validate_submission(second.id, enterprise.id, "APPROVED", None)
        .await
        .unwrap();

    let detail = reload(&storage, project.project.id).await;
    assert_eq!(
        detail.deliverables[0].deliverable.status,
        DeliverableStatus::Completed
    );
    assert_eq!(detail.progress, 100);

    let err = storage
        .create_submission(
            student.id,
            CreateSubmissionRequest {
                task_id: task_id(&project, 0, 0),
                submission_link: "https://github.com/ana/again".to_string(),
                branch_name: None,
                evidence_file: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::Conflict(_)));
}

#[actix_web::test]
async fn test_rejected_submission_can_be_resubmitted() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;
    let student = seed_student(&storage, "Ana", "ana@example.com").await;
    let project = publish_in(
        &storage,
        enterprise.id,
        draft("Portal", &[("Backend", &["API"])]),
        &[ProjectStatus::Open, ProjectStatus::InProgress],
    )
    .await;

    let submission = submit(&storage, student.id, task_id(&project, 0, 0)).await;
    let rejected = storage
        .validate_submission(
            submission.id,
            enterprise.id,
            "REJECTED",
            Some("Missing tests".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(rejected.status, SubmissionStatus::Rejected);
    assert_eq!(rejected.feedback.as_deref(), Some("Missing tests"));

    let detail = reload(&storage, project.project.id).await;
    assert_eq!(
        detail.deliverables[0].tasks[0].task.status,
        TaskStatus::Rejected
    );

    let resubmitted = submit(&storage, student.id, task_id(&project, 0, 0)).await;
    assert_eq!(resubmitted.id, submission.id);
    assert_eq!(resubmitted.status, SubmissionStatus::Pending);
    assert_eq!(resubmitted.feedback.as_deref(), Some(""));
    assert!(resubmitted.validated_by.is_none());
}

#[actix_web::test]
async fn test_reject_reopens_completed_deliverable() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;
    let student = seed_student(&storage, "Ana", "ana@example.com").await;
    let project = publish_in(
        &storage,
        enterprise.id,
        draft("Portal", &[("Backend", &["API"])]),
        &[ProjectStatus::Open, ProjectStatus::InProgress],
    )
    .await;

    let submission = submit(&storage, student.id, task_id(&project, 0, 0)).await;
    let project = storage
        .transition_project(project.project.id, ProjectStatus::Completed)
        .await
        .unwrap();
    assert_eq!(
        project.deliverables[0].deliverable.status,
        DeliverableStatus::Completed
    );

    storage
        .validate_submission(submission.id, enterprise.id, "REJECTED", None)
        .await
        .unwrap();

    let detail = reload(&storage, project.project.id).await;
    assert_eq!(
        detail.deliverables[0].deliverable.status,
        DeliverableStatus::InDevelopment
    );
}

#[actix_web::test]
async fn test_validate_rejects_unknown_decision() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;
    let student = seed_student(&storage, "Ana", "ana@example.com").await;
    let project = publish_in(
        &storage,
        enterprise.id,
        draft("Portal", &[("Backend", &["API"])]),
        &[ProjectStatus::Open],
    )
    .await;
    let submission = submit(&storage, student.id, task_id(&project, 0, 0)).await;

    let err = storage
        .validate_submission(submission.id, enterprise.id, "PENDING", None)
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::Validation(_)));

    let err = storage
        .validate_submission(submission.id, Uuid::new_v4(), "APPROVED", None)
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::NotFound(_)));

    let unchanged = storage.get_submission(submission.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, SubmissionStatus::Pending);
}

#[actix_web::test]
async fn test_review_list_filters() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;
    let other = seed_enterprise(&storage, "globex@example.com").await;
    let ana = seed_student(&storage, "Ana", "ana@example.com").await;
    let bruno = seed_student(&storage, "Bruno", "bruno@example.com").await;
    let project = publish_in(
        &storage,
        enterprise.id,
        draft("Portal", &[("Backend", &["Login API", "Database"])]),
        &[ProjectStatus::Open],
    )
    .await;

    let first = submit(&storage, ana.id, task_id(&project, 0, 0)).await;
    submit(&storage, bruno.id, task_id(&project, 0, 1)).await;
    storage
        .validate_submission(first.id, enterprise.id, "APPROVED", None)
        .await
        .unwrap();

    let all = storage
        .list_submissions_for_review(enterprise.id, SubmissionReviewQuery::default())
        .await
        .unwrap();
    assert_eq!(all.pagination.total, 2);

    let by_student = storage
        .list_submissions_for_review(
            enterprise.id,
            SubmissionReviewQuery {
                search: Some("BRU".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_student.items.len(), 1);
    assert_eq!(by_student.items[0].student.id, bruno.id);

    let by_task = storage
        .list_submissions_for_review(
            enterprise.id,
            SubmissionReviewQuery {
                search: Some("login".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_task.items.len(), 1);
    assert_eq!(by_task.items[0].task.name, "Login API");
    assert_eq!(by_task.items[0].project.id, project.project.id);

    let approved = storage
        .list_submissions_for_review(
            enterprise.id,
            SubmissionReviewQuery {
                status: Some("APPROVED".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(approved.items.len(), 1);
    assert_eq!(approved.items[0].submission.id, first.id);

    let bad_status = storage
        .list_submissions_for_review(
            enterprise.id,
            SubmissionReviewQuery {
                status: Some("DONE".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(bad_status, TkseError::Validation(_)));

    let foreign = storage
        .list_submissions_for_review(other.id, SubmissionReviewQuery::default())
        .await
        .unwrap();
    assert!(foreign.items.is_empty());

    let history = storage.list_student_submissions(ana.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(
        history[0].validator.as_ref().map(|v| v.id),
        Some(enterprise.id)
    );
}

#[actix_web::test]
async fn test_enterprise_dashboard_summary() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;
    let student = seed_student(&storage, "Ana", "ana@example.com").await;
    publish_in(
        &storage,
        enterprise.id,
        draft("Draft", &[("Backend", &["API"])]),
        &[],
    )
    .await;
    let open = publish_in(
        &storage,
        enterprise.id,
        draft("Portal", &[("Backend", &["API", "DB"])]),
        &[ProjectStatus::Open],
    )
    .await;
    storage
        .join_project(student.id, open.project.id)
        .await
        .unwrap();

    let summary = storage
        .enterprise_dashboard_summary(enterprise.id)
        .await
        .unwrap();
    assert_eq!(summary.active_projects, 1);
    assert_eq!(summary.pending_tasks, 2);
    assert_eq!(summary.students, 1);

    let dashboard = storage.student_dashboard(student.id).await.unwrap();
    assert_eq!(dashboard.total_deliverables, 1);
    assert_eq!(dashboard.completed_tasks, 0);
    assert_eq!(dashboard.in_progress_tasks, 2);
}

#[actix_web::test]
async fn test_chat_history_is_ordered_and_scoped() {
    let storage = storage().await;

    storage.save_chat_message("a", "b", "hi").await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    storage.save_chat_message("b", "a", "hello").await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    storage.save_chat_message("a", "c", "elsewhere").await.unwrap();

    let history = storage.chat_history("b", "a").await.unwrap();
    let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["hi", "hello"]);

    assert!(storage.chat_history("b", "c").await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_reset_token_lifecycle() {
    let storage = storage().await;
    let student = seed_student(&storage, "Ana", "ana@example.com").await;

    let first = storage
        .create_reset_token(&student.email, AccountType::Student, student.id, 60)
        .await
        .unwrap();
    let second = storage
        .create_reset_token(&student.email, AccountType::Student, student.id, 60)
        .await
        .unwrap();
    assert_ne!(first.token, second.token);

    let first = storage.get_reset_token(&first.token).await.unwrap().unwrap();
    assert!(first.is_used);

    let err = storage
        .consume_reset_token(&first.token, "new-hash")
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::Validation(_)));

    storage
        .consume_reset_token(&second.token, "new-hash")
        .await
        .unwrap();
    let updated = storage.get_student_by_id(student.id).await.unwrap().unwrap();
    assert_eq!(updated.password_hash, "new-hash");

    let err = storage
        .consume_reset_token(&second.token, "another-hash")
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::Validation(_)));
}

#[actix_web::test]
async fn test_expired_reset_token_is_rejected() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;

    let token = storage
        .create_reset_token(&enterprise.email, AccountType::Enterprise, enterprise.id, 0)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let err = storage
        .consume_reset_token(&token.token, "new-hash")
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::Validation(_)));
}

#[actix_web::test]
async fn test_stale_transition_write_is_rejected() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;
    let project = publish_in(
        &storage,
        enterprise.id,
        draft("Portal", &[("Backend", &["API"])]),
        &[ProjectStatus::Open],
    )
    .await;
    let id = project.project.id;

    // 基于过期读取（仍以为是 PENDING）的写入不生效
    let err = apply_transition(
        &storage.db,
        id,
        ProjectStatus::Pending,
        ProjectStatus::Cancelled,
        now_millis(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, TkseError::Conflict(_)));

    let unchanged = reload(&storage, id).await;
    assert_eq!(unchanged.project.status, ProjectStatus::Open);

    apply_transition(
        &storage.db,
        id,
        ProjectStatus::Open,
        ProjectStatus::InProgress,
        now_millis(),
    )
    .await
    .unwrap();
    let moved = reload(&storage, id).await;
    assert_eq!(moved.project.status, ProjectStatus::InProgress);
    assert_eq!(
        moved.deliverables[0].deliverable.status,
        DeliverableStatus::InDevelopment
    );
}

#[actix_web::test]
async fn test_unrecognized_project_status_is_an_error() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;
    let student = seed_student(&storage, "Ana", "ana@example.com").await;
    let project = publish_in(&storage, enterprise.id, draft("Portal", &[]), &[]).await;

    Projects::update_many()
        .col_expr(projects::Column::Status, Expr::value("FINISHED"))
        .filter(projects::Column::Id.eq(project.project.id))
        .exec(&storage.db)
        .await
        .unwrap();

    let err = storage
        .transition_project(project.project.id, ProjectStatus::Open)
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::DatabaseOperation(_)));

    let err = storage
        .join_project(student.id, project.project.id)
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::DatabaseOperation(_)));
}

fn pending_row(task_id: Uuid, student_id: Uuid) -> SubmissionActiveModel {
    SubmissionActiveModel {
        id: Set(Uuid::new_v4()),
        task_id: Set(task_id),
        student_id: Set(student_id),
        validated_by: Set(None),
        submission_link: Set("https://github.com/ana/repo".to_string()),
        branch_name: Set(None),
        evidence_file: Set(None),
        status: Set(SubmissionStatus::Pending.to_string()),
        feedback: Set(None),
        pending_key: Set(Some(pending_key(task_id, student_id))),
        submitted_at: Set(now_millis()),
        validated_at: Set(None),
    }
}

#[actix_web::test]
async fn test_pending_key_blocks_second_pending_row() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;
    let student = seed_student(&storage, "Ana", "ana@example.com").await;
    let project = publish_in(
        &storage,
        enterprise.id,
        draft("Portal", &[("Backend", &["API"])]),
        &[ProjectStatus::Open],
    )
    .await;
    let task = task_id(&project, 0, 0);

    // 两个并发请求都越过了"最新提交"检查时，数据库只接受一行
    let first = pending_row(task, student.id).insert(&storage.db).await.unwrap();
    let db_err = pending_row(task, student.id)
        .insert(&storage.db)
        .await
        .unwrap_err();
    match map_write_err(db_err, ALREADY_PENDING, "创建提交失败") {
        TkseError::Conflict(msg) => assert_eq!(msg, ALREADY_PENDING),
        other => panic!("expected conflict, got {other:?}"),
    }

    // 审核后键被释放
    storage
        .validate_submission(first.id, enterprise.id, "REJECTED", Some("again".to_string()))
        .await
        .unwrap();
    pending_row(task, student.id)
        .insert(&storage.db)
        .await
        .unwrap();
}

#[actix_web::test]
async fn test_search_matches_accented_names_in_any_case() {
    let storage = storage().await;
    let enterprise = seed_enterprise(&storage, "acme@example.com").await;
    let alvaro = seed_student(&storage, "Álvaro Souza", "alvaro@example.com").await;
    let alvara = seed_student(&storage, "Álvara Lima", "alvara@example.com").await;
    let project = publish_in(
        &storage,
        enterprise.id,
        draft("Integração Contábil", &[("Integração", &["Ação", "Relatório"])]),
        &[ProjectStatus::Open],
    )
    .await;

    submit(&storage, alvaro.id, task_id(&project, 0, 0)).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    submit(&storage, alvara.id, task_id(&project, 0, 1)).await;

    let review = |search: &str, page: i64, size: i64| SubmissionReviewQuery {
        pagination: PaginationQuery { page, size },
        search: Some(search.to_string()),
        ..Default::default()
    };

    for (search, expected) in [
        ("Álvaro", 1),
        ("álvaro", 1),
        ("ÁLVARO", 1),
        ("INTEGRAÇÃO", 2),
        ("ação", 2),
        ("relatório", 1),
        ("Alvaro", 0),
    ] {
        let found = storage
            .list_submissions_for_review(enterprise.id, review(search, 1, 10))
            .await
            .unwrap();
        assert_eq!(found.items.len(), expected, "search {search:?}");
        assert_eq!(found.pagination.total, expected as i64, "search {search:?}");
    }

    // 搜索结果按提交时间倒序分页
    let first_page = storage
        .list_submissions_for_review(enterprise.id, review("álva", 1, 1))
        .await
        .unwrap();
    let second_page = storage
        .list_submissions_for_review(enterprise.id, review("álva", 2, 1))
        .await
        .unwrap();
    assert_eq!(first_page.pagination.total, 2);
    assert_eq!(first_page.pagination.total_pages, 2);
    assert_eq!(first_page.items[0].student.id, alvara.id);
    assert_eq!(second_page.items[0].student.id, alvaro.id);

    let students = storage
        .list_students_with_pagination(StudentListQuery {
            search: Some("ÁLVARO".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(students.items.len(), 1);
    assert_eq!(students.items[0].id, alvaro.id);

    let listed = storage
        .list_projects_with_pagination(ProjectListQuery {
            search: Some("integração contábil".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(listed.pagination.total, 1);
    assert_eq!(listed.items[0].project.id, project.project.id);
}

#[actix_web::test]
async fn test_enterprises_by_student_are_distinct_and_active() {
    let storage = storage().await;
    let acme = seed_enterprise(&storage, "acme@example.com").await;
    let globex = seed_enterprise(&storage, "globex@example.com").await;
    let student = seed_student(&storage, "Ana", "ana@example.com").await;

    assert!(
        storage
            .list_enterprises_by_student(student.id)
            .await
            .unwrap()
            .is_empty()
    );

    for (enterprise_id, name) in [(acme.id, "Portal"), (acme.id, "Loja"), (globex.id, "ERP")] {
        let open = publish_in(
            &storage,
            enterprise_id,
            draft(name, &[("Backend", &["API"])]),
            &[ProjectStatus::Open],
        )
        .await;
        storage
            .join_project(student.id, open.project.id)
            .await
            .unwrap();
    }

    let enterprises = storage.list_enterprises_by_student(student.id).await.unwrap();
    let mut ids: Vec<Uuid> = enterprises.iter().map(|e| e.id).collect();
    ids.sort();
    let mut expected = vec![acme.id, globex.id];
    expected.sort();
    assert_eq!(ids, expected);

    // 停用的企业不再出现
    assert!(storage.delete_enterprise(globex.id).await.unwrap());
    let enterprises = storage.list_enterprises_by_student(student.id).await.unwrap();
    assert_eq!(enterprises.len(), 1);
    assert_eq!(enterprises[0].id, acme.id);

    let err = storage
        .list_enterprises_by_student(Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, TkseError::NotFound(_)));
}
