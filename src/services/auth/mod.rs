pub mod login;
pub mod mailer;
pub mod password_reset;

pub use mailer::{LogMailer, Mailer};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::auth::{
    AccountType, LoginRequest,
    requests::{ForgotPasswordRequest, ResetPasswordRequest},
};
use crate::storage::Storage;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
    mailer: Option<Arc<dyn Mailer>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            mailer: None,
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_mailer(&self, request: &HttpRequest) -> Arc<dyn Mailer> {
        if let Some(mailer) = &self.mailer {
            mailer.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Mailer>>>()
                .expect("Mailer not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 登录（企业或学生）
    pub async fn login(
        &self,
        account_type: AccountType,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, account_type, login_request, request).await
    }

    // 申请重置密码
    pub async fn forgot_password(
        &self,
        account_type: AccountType,
        forgot_request: ForgotPasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password_reset::handle_forgot_password(self, account_type, forgot_request, request).await
    }

    // 使用令牌重置密码
    pub async fn reset_password(
        &self,
        reset_request: ResetPasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password_reset::handle_reset_password(self, reset_request, request).await
    }

    // 校验重置令牌
    pub async fn validate_reset_token(
        &self,
        token: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password_reset::handle_validate_token(self, token, request).await
    }
}
