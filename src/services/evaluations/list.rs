use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::errors::{Result, TycoonError};
use crate::models::evaluations::{entities::EvaluationStatus, responses::MyEvaluationsResponse};
use crate::models::{ApiResponse, error_response};
use crate::storage::Storage;

/// 查询学生在作业中的评审任务
pub async fn my_evaluations(
    storage: &dyn Storage,
    assignment_id: i64,
    evaluator_id: i64,
) -> Result<MyEvaluationsResponse> {
    storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| TycoonError::not_found(format!("作业 {assignment_id} 不存在")))?;

    let items = storage
        .list_evaluation_assignments(assignment_id, Some(evaluator_id))
        .await?;
    let completed = items
        .iter()
        .filter(|e| e.status == EvaluationStatus::Completed)
        .count() as i32;

    Ok(MyEvaluationsResponse {
        total: items.len() as i32,
        completed,
        items,
    })
}

pub async fn list_my_evaluations(
    service: &EvaluationService,
    request: &HttpRequest,
    assignment_id: i64,
    evaluator_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match my_evaluations(storage.as_ref(), assignment_id, evaluator_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
