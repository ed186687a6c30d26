use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::AssignmentService;
use crate::config::{AppConfig, DistributionConfig};
use crate::errors::{Result, TycoonError};
use crate::models::assignments::{entities::Assignment, requests::CreateAssignmentRequest};
use crate::models::{ApiResponse, error_response};
use crate::storage::Storage;

pub async fn create(
    storage: &dyn Storage,
    config: &DistributionConfig,
    created_by: i64,
    mut req: CreateAssignmentRequest,
) -> Result<Assignment> {
    req.title = req.title.trim().to_string();
    if req.title.is_empty() {
        return Err(TycoonError::validation("作业标题不能为空"));
    }

    if let (Some(submission_due), Some(evaluation_due)) =
        (req.submission_due_at, req.evaluation_due_at)
        && evaluation_due < submission_due
    {
        return Err(TycoonError::validation("评审截止时间不能早于提交截止时间"));
    }

    let per_student = req
        .evaluations_per_student
        .unwrap_or(config.default_evaluations_per_student);
    if per_student < config.min_evaluations_per_student
        || per_student > config.max_evaluations_per_student
    {
        return Err(TycoonError::validation(format!(
            "每名学生的评审数必须在 {} 到 {} 之间",
            config.min_evaluations_per_student, config.max_evaluations_per_student
        )));
    }

    let assignment = storage
        .create_assignment(created_by, req, per_student)
        .await?;
    info!(assignment_id = assignment.id, created_by, "作业已创建");

    Ok(assignment)
}

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    created_by: i64,
    req: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = &AppConfig::get().distribution;

    match create(storage.as_ref(), config, created_by, req).await {
        Ok(assignment) => Ok(HttpResponse::Created().json(ApiResponse::success(assignment, "作业创建成功"))),
        Err(e) => {
            warn!("创建作业失败: {}", e);
            Ok(error_response(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::testing::{create_user, memory_storage};
    use chrono::{Duration, Utc};

    fn request(title: &str) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            course_id: 1,
            title: title.to_string(),
            description: Some("Pitch your startup".to_string()),
            submission_due_at: None,
            evaluation_due_at: None,
            evaluations_per_student: None,
        }
    }

    #[tokio::test]
    async fn test_defaults_and_validation() {
        let storage = memory_storage().await;
        let teacher = create_user(storage.as_ref(), "t", UserRole::Teacher).await;
        let config = DistributionConfig::default();

        let assignment = create(storage.as_ref(), &config, teacher.id, request(" Week 1 "))
            .await
            .unwrap();
        assert_eq!(assignment.title, "Week 1");
        assert_eq!(assignment.evaluations_per_student, 5);
        assert!(!assignment.is_evaluation_active);

        let err = create(storage.as_ref(), &config, teacher.id, request("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, TycoonError::Validation(_)));

        let mut too_many = request("Week 2");
        too_many.evaluations_per_student = Some(11);
        let err = create(storage.as_ref(), &config, teacher.id, too_many)
            .await
            .unwrap_err();
        assert!(matches!(err, TycoonError::Validation(_)));

        let mut backwards = request("Week 3");
        backwards.submission_due_at = Some(Utc::now());
        backwards.evaluation_due_at = Some(Utc::now() - Duration::days(1));
        let err = create(storage.as_ref(), &config, teacher.id, backwards)
            .await
            .unwrap_err();
        assert!(matches!(err, TycoonError::Validation(_)));
    }
}
