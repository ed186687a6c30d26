pub mod distribute;
pub mod list;
pub mod planner;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::evaluations::requests::DistributeEvaluationsRequest;
use crate::storage::Storage;

pub struct EvaluationService {
    storage: Option<Arc<dyn Storage>>,
}

impl EvaluationService {
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

    pub async fn distribute_evaluations(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        distributed_by: i64,
        req: DistributeEvaluationsRequest,
    ) -> ActixResult<HttpResponse> {
        distribute::distribute_evaluations(self, request, assignment_id, distributed_by, req).await
    }

    pub async fn list_my_evaluations(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        evaluator_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_my_evaluations(self, request, assignment_id, evaluator_id).await
    }
}
