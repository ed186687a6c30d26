use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::SubmissionService;
use crate::errors::{Result, TycoonError};
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::SubmitRequest,
};
use crate::models::{ApiResponse, error_response};
use crate::storage::Storage;

/// 以团队名义提交或保存草稿
pub async fn save(
    storage: &dyn Storage,
    assignment_id: i64,
    user_id: i64,
    req: SubmitRequest,
    now: DateTime<Utc>,
) -> Result<Submission> {
    let content = req.content.trim().to_string();
    if content.is_empty() {
        return Err(TycoonError::validation("提交内容不能为空"));
    }

    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| TycoonError::not_found(format!("作业 {assignment_id} 不存在")))?;

    let team = storage
        .get_user_team_for_assignment(assignment_id, user_id)
        .await?
        .ok_or_else(|| TycoonError::not_found("你不属于该作业的任何团队"))?;

    let status = req.status.unwrap_or(SubmissionStatus::Submitted);
    if status == SubmissionStatus::Submitted && assignment.submission_closed(now) {
        return Err(TycoonError::validation("已过提交截止时间"));
    }

    if status == SubmissionStatus::Draft
        && let Some(existing) = storage.get_team_submission(assignment_id, team.id).await?
        && existing.status == SubmissionStatus::Submitted
    {
        return Err(TycoonError::validation("已提交的作品不能改回草稿"));
    }

    let submission = storage
        .upsert_submission(assignment_id, team.id, user_id, content, status)
        .await?;

    info!(
        assignment_id,
        team_id = team.id,
        status = %submission.status,
        "团队提交已保存"
    );

    Ok(submission)
}

pub async fn submit(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    user_id: i64,
    req: SubmitRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match save(storage.as_ref(), assignment_id, user_id, req, Utc::now()).await {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "提交成功"))),
        Err(e) => {
            warn!(assignment_id, user_id, "提交失败: {}", e);
            Ok(error_response(&e))
        }
    }
}
