pub mod webhook;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::voomp::VoompWebhookPayload;
use crate::services::auth::Mailer;
use crate::storage::Storage;

pub struct VoompService {
    storage: Option<Arc<dyn Storage>>,
    mailer: Option<Arc<dyn Mailer>>,
}

impl VoompService {
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

    // 处理支付回调
    pub async fn handle_webhook(
        &self,
        request: &HttpRequest,
        payload: VoompWebhookPayload,
    ) -> ActixResult<HttpResponse> {
        webhook::handle_webhook(self, request, payload).await
    }
}
