use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::errors::TycoonError;
use crate::models::{ApiResponse, error_response};

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "查询成功"))),
        Ok(None) => Ok(error_response(&TycoonError::not_found(format!(
            "作业 {assignment_id} 不存在"
        )))),
        Err(e) => Ok(error_response(&e)),
    }
}
