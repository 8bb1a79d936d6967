pub mod create;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::countries::requests::{CreateCountryRequest, UpdateCountryRequest};
use crate::storage::Storage;

pub struct CountryService {
    storage: Option<Arc<dyn Storage>>,
}

impl CountryService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
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

    pub async fn create_country(
        &self,
        request: &HttpRequest,
        req: CreateCountryRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_country(self, request, req).await
    }

    pub async fn list_countries(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::list_countries(self, request).await
    }

    pub async fn get_country(
        &self,
        request: &HttpRequest,
        country_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        manage::get_country(self, request, country_id).await
    }

    pub async fn update_country(
        &self,
        request: &HttpRequest,
        country_id: Uuid,
        req: UpdateCountryRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_country(self, request, country_id, req).await
    }

    pub async fn delete_country(
        &self,
        request: &HttpRequest,
        country_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        manage::delete_country(self, request, country_id).await
    }
}
