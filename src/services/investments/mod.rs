pub mod invest;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::investments::requests::InvestRequest;
use crate::storage::Storage;

pub struct InvestmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl InvestmentService {
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

    pub async fn invest(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        investor_id: i64,
        req: InvestRequest,
    ) -> ActixResult<HttpResponse> {
        invest::invest(self, request, assignment_id, investor_id, req).await
    }
}
