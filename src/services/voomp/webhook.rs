//! Voomp 付款回调：为新付款的客户开通学生账号并发送设置密码的欢迎邮件

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use super::VoompService;
use crate::config::{AppConfig, PasswordResetConfig};
use crate::errors::{Result, TkseError};
use crate::models::auth::AccountType;
use crate::models::students::requests::CreateStudentRequest;
use crate::models::voomp::{VoompWebhookOutcome, VoompWebhookPayload, VoompWebhookResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::auth::{Mailer, mailer::build_reset_link};
use crate::services::{error_response, normalize_email};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_random_code;
use crate::utils::validate::{validate_email, validate_name};

/// 回调携带的共享令牌请求头
pub const WEBHOOK_TOKEN_HEADER: &str = "X-Webhook-Token";

/// 付款开通账号的默认角色
pub const PAID_STUDENT_ROLE: &str = "introduction";

pub async fn handle_webhook(
    service: &VoompService,
    request: &HttpRequest,
    payload: VoompWebhookPayload,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    if !webhook_token_matches(request, &config.voomp.webhook_token) {
        warn!("Rejected Voomp webhook for sale {}: bad token", payload.sale.id);
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Invalid webhook token",
        )));
    }

    info!(
        "Voomp webhook received: sale={} trigger={} status={} -> {}",
        payload.sale.id, payload.trigger, payload.old_status, payload.current_status
    );

    let storage = service.get_storage(request);
    let mailer = service.get_mailer(request);
    match provision_student(
        storage.as_ref(),
        mailer.as_ref(),
        &config.password_reset,
        &payload,
    )
    .await
    {
        Ok(response) => {
            let message = match response.outcome {
                VoompWebhookOutcome::Ignored => "Event ignored: not a confirmed payment",
                VoompWebhookOutcome::Existing => "Student already exists",
                VoompWebhookOutcome::Created => "Student created successfully",
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, message)))
        }
        Err(e) => {
            error!("Voomp webhook for sale {} failed: {}", payload.sale.id, e);
            Ok(error_response(&e))
        }
    }
}

/// 未配置令牌时不校验
pub(crate) fn webhook_token_matches(request: &HttpRequest, expected: &str) -> bool {
    if expected.is_empty() {
        return true;
    }
    request
        .headers()
        .get(WEBHOOK_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|token| token == expected)
}

/// 为付款确认事件开通学生账号
///
/// 同一邮箱重复回调只返回已有账号，不会再次发送邮件。欢迎邮件失败不回滚账号，
/// 学生仍可通过找回密码设置密码。
pub(crate) async fn provision_student(
    storage: &dyn Storage,
    mailer: &dyn Mailer,
    reset_config: &PasswordResetConfig,
    payload: &VoompWebhookPayload,
) -> Result<VoompWebhookResponse> {
    if !payload.is_confirmed_payment() {
        return Ok(VoompWebhookResponse {
            outcome: VoompWebhookOutcome::Ignored,
            student_id: None,
            welcome_sent: false,
        });
    }

    let client = &payload.client;
    validate_email(&client.email).map_err(TkseError::validation)?;
    validate_name(&client.name).map_err(TkseError::validation)?;
    let email = normalize_email(&client.email);
    let name = client.name.trim().to_string();

    if let Some(existing) = storage.get_student_by_email(&email).await? {
        return Ok(existing_response(existing.id));
    }

    // 随机密码不告知任何人，账号需通过欢迎邮件中的链接设置密码
    let password = hash_password(&generate_random_code(32))?;
    let phone = Some(client.cellphone.trim().to_string()).filter(|p| !p.is_empty());
    let created = storage
        .create_student(CreateStudentRequest {
            name: name.clone(),
            email: email.clone(),
            password,
            phone,
            role: Some(PAID_STUDENT_ROLE.to_string()),
            location: None,
            photo: None,
            cargo: None,
            bio: None,
            github: None,
            linkedin: None,
        })
        .await;

    let student = match created {
        Ok(student) => student,
        // 并发的重复回调先一步建好了账号
        Err(TkseError::Conflict(msg)) => {
            return match storage.get_student_by_email(&email).await? {
                Some(existing) => Ok(existing_response(existing.id)),
                None => Err(TkseError::conflict(msg)),
            };
        }
        Err(e) => return Err(e),
    };
    info!("Student {} provisioned from Voomp sale {}", student.id, payload.sale.id);

    let token = storage
        .create_reset_token(
            &email,
            AccountType::Student,
            student.id,
            reset_config.token_ttl_minutes,
        )
        .await?;
    let link = build_reset_link(&reset_config.frontend_reset_url, &token.token);

    let welcome_sent = match mailer.send_welcome(&email, &name, &link).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to deliver welcome email to {}: {}", email, e);
            false
        }
    };

    Ok(VoompWebhookResponse {
        outcome: VoompWebhookOutcome::Created,
        student_id: Some(student.id),
        welcome_sent,
    })
}

fn existing_response(student_id: uuid::Uuid) -> VoompWebhookResponse {
    VoompWebhookResponse {
        outcome: VoompWebhookOutcome::Existing,
        student_id: Some(student_id),
        welcome_sent: false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use actix_web::test::TestRequest;
    use async_trait::async_trait;
    use sea_orm::{ConnectOptions, Database};

    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    #[derive(Default)]
    struct RecordingMailer {
        fail: bool,
        welcomes: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_password_reset(&self, _: &str, _: AccountType, _: &str) -> Result<()> {
            Ok(())
        }

        async fn send_welcome(&self, email: &str, name: &str, setup_link: &str) -> Result<()> {
            if self.fail {
                return Err(TkseError::mail("smtp unavailable"));
            }
            self.welcomes.lock().unwrap().push((
                email.to_string(),
                name.to_string(),
                setup_link.to_string(),
            ));
            Ok(())
        }
    }

    async fn storage() -> SeaOrmStorage {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        SeaOrmStorage::from_connection(db).await.unwrap()
    }

    fn reset_config() -> PasswordResetConfig {
        PasswordResetConfig {
            token_ttl_minutes: 60,
            frontend_reset_url: "http://app/reset-password".to_string(),
        }
    }

    fn payload(trigger: &str, status: &str) -> VoompWebhookPayload {
        serde_json::from_value(serde_json::json!({
            "sale": {"id": 91, "amount": 197.0, "method": "pix", "status": status, "smart_sale": 0},
            "type": "sale",
            "client": {
                "id": 7, "city": "Recife", "name": " Maria Luíza ",
                "email": "Maria@Example.com", "street": "Rua A", "cellphone": "81999990000"
            },
            "product": {"id": 3, "name": "Trilha Backend"},
            "trigger": trigger,
            "oldStatus": "waiting_payment",
            "saleMetas": [],
            "productMetas": {},
            "currentStatus": status,
            "proposalMetas": []
        }))
        .unwrap()
    }

    #[actix_web::test]
    async fn test_unpaid_event_is_ignored() {
        let storage = storage().await;
        let mailer = RecordingMailer::default();

        let response = provision_student(
            &storage,
            &mailer,
            &reset_config(),
            &payload("saleCreated", "waiting_payment"),
        )
        .await
        .unwrap();

        assert_eq!(response.outcome, VoompWebhookOutcome::Ignored);
        assert!(
            storage
                .get_student_by_email("maria@example.com")
                .await
                .unwrap()
                .is_none()
        );
        assert!(mailer.welcomes.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_paid_sale_creates_student_and_sends_setup_link() {
        let storage = storage().await;
        let mailer = RecordingMailer::default();

        let response = provision_student(
            &storage,
            &mailer,
            &reset_config(),
            &payload("salePaid", "paid"),
        )
        .await
        .unwrap();
        assert_eq!(response.outcome, VoompWebhookOutcome::Created);
        assert!(response.welcome_sent);

        let student = storage
            .get_student_by_email("maria@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(response.student_id, Some(student.id));
        assert_eq!(student.name, "Maria Luíza");
        assert_eq!(student.role.as_deref(), Some(PAID_STUDENT_ROLE));
        assert_eq!(student.phone.as_deref(), Some("81999990000"));

        let welcomes = mailer.welcomes.lock().unwrap().clone();
        assert_eq!(welcomes.len(), 1);
        let (email, name, link) = &welcomes[0];
        assert_eq!(email, "maria@example.com");
        assert_eq!(name, "Maria Luíza");

        let token = link
            .strip_prefix("http://app/reset-password?token=")
            .unwrap();
        let stored = storage.get_reset_token(token).await.unwrap().unwrap();
        assert!(stored.is_usable(chrono::Utc::now()));
        assert_eq!(stored.account_type, AccountType::Student);
        assert_eq!(stored.account_id, student.id);
    }

    #[actix_web::test]
    async fn test_repeated_delivery_returns_existing_student() {
        let storage = storage().await;
        let mailer = RecordingMailer::default();
        let paid = payload("salePaid", "paid");

        let first = provision_student(&storage, &mailer, &reset_config(), &paid)
            .await
            .unwrap();
        let second = provision_student(&storage, &mailer, &reset_config(), &paid)
            .await
            .unwrap();

        assert_eq!(second.outcome, VoompWebhookOutcome::Existing);
        assert_eq!(second.student_id, first.student_id);
        assert_eq!(mailer.welcomes.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_failed_welcome_keeps_the_account() {
        let storage = storage().await;
        let mailer = RecordingMailer {
            fail: true,
            ..Default::default()
        };

        let response = provision_student(
            &storage,
            &mailer,
            &reset_config(),
            &payload("salePaid", "paid"),
        )
        .await
        .unwrap();

        assert_eq!(response.outcome, VoompWebhookOutcome::Created);
        assert!(!response.welcome_sent);
        assert!(
            storage
                .get_student_by_email("maria@example.com")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[actix_web::test]
    async fn test_invalid_client_email_is_rejected() {
        let storage = storage().await;
        let mailer = RecordingMailer::default();
        let mut paid = payload("salePaid", "paid");
        paid.client.email = "not-an-email".to_string();

        let err = provision_student(&storage, &mailer, &reset_config(), &paid)
            .await
            .unwrap_err();
        assert!(matches!(err, TkseError::Validation(_)));
    }

    #[test]
    fn test_webhook_token_header() {
        let req = TestRequest::default().to_http_request();
        assert!(webhook_token_matches(&req, ""));
        assert!(!webhook_token_matches(&req, "s3cret"));

        let req = TestRequest::default()
            .insert_header((WEBHOOK_TOKEN_HEADER, "s3cret"))
            .to_http_request();
        assert!(webhook_token_matches(&req, "s3cret"));
        assert!(!webhook_token_matches(&req, "other"));
    }
}
