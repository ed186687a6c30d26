use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use super::scoring::grade_stats;
use crate::errors::{Result, TycoonError};
use crate::models::grades::responses::GradeListResponse;
use crate::models::{ApiResponse, error_response};
use crate::storage::Storage;

/// 作业成绩列表及统计
pub async fn grades_with_stats(
    storage: &dyn Storage,
    assignment_id: i64,
) -> Result<GradeListResponse> {
    storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| TycoonError::not_found(format!("作业 {assignment_id} 不存在")))?;

    let items = storage.list_grades_by_assignment(assignment_id).await?;
    let stats = grade_stats(&items);

    Ok(GradeListResponse { items, stats })
}

pub async fn list_grades(
    service: &GradeService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match grades_with_stats(storage.as_ref(), assignment_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
