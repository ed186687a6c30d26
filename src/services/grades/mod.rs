pub mod calculate;
pub mod list;
pub mod override_grade;
pub mod publish;
pub mod scoring;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grades::requests::OverrideGradeRequest;
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
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

    pub async fn calculate_grades(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        calculate::calculate_grades(self, request, assignment_id).await
    }

    pub async fn list_grades(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_grades(self, request, assignment_id).await
    }

    pub async fn override_grade(
        &self,
        request: &HttpRequest,
        grade_id: i64,
        reviewed_by: i64,
        req: OverrideGradeRequest,
    ) -> ActixResult<HttpResponse> {
        override_grade::override_grade(self, request, grade_id, reviewed_by, req).await
    }

    pub async fn publish_grades(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        publish::publish_grades(self, request, assignment_id).await
    }
}
