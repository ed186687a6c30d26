use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::GradeService;
use crate::config::{AppConfig, GradingConfig, InterestConfig};
use crate::errors::{Result, TycoonError};
use crate::models::grades::responses::PublishGradesResponse;
use crate::models::{ApiResponse, error_response};
use crate::services::interest::accrue::accrue_interest;
use crate::storage::Storage;

/// 发布作业成绩并重新计算利息
pub async fn publish(
    storage: &dyn Storage,
    grading: &GradingConfig,
    interest: &InterestConfig,
    assignment_id: i64,
) -> Result<PublishGradesResponse> {
    storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| TycoonError::not_found(format!("作业 {assignment_id} 不存在")))?;

    let published = storage.publish_grades(assignment_id).await?;
    let interest_records = accrue_interest(storage, grading, interest, assignment_id).await?;

    info!(assignment_id, published, interest_records, "成绩已发布");

    Ok(PublishGradesResponse {
        assignment_id,
        published: published as i64,
        interest_records: interest_records as i64,
    })
}

pub async fn publish_grades(
    service: &GradeService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = AppConfig::get();

    match publish(storage.as_ref(), &config.grading, &config.interest, assignment_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "成绩已发布"))),
        Err(e) => {
            warn!(assignment_id, "发布成绩失败: {}", e);
            Ok(error_response(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::entities::NewEvaluationAssignment;
    use crate::models::grades::entities::GradeStatus;
    use crate::services::grades::calculate::calculate;
    use crate::storage::testing::classroom;

    #[tokio::test]
    async fn test_publish_accrues_interest_once() {
        let room = classroom(&[1, 1, 1]).await;
        let storage = room.storage();
        let grading = GradingConfig::default();
        let interest = InterestConfig::default();

        let investor = room.member(0, 0);
        let mut rows = Vec::new();
        for team in &room.teams[1..] {
            let submission = storage
                .get_team_submission(room.assignment.id, team.id)
                .await
                .unwrap()
                .unwrap();
            rows.push(NewEvaluationAssignment {
                evaluator_id: investor,
                team_id: team.id,
                submission_id: submission.id,
            });
        }
        storage
            .create_evaluation_distribution(room.assignment.id, 2, room.teacher.id, rows)
            .await
            .unwrap();
        storage
            .record_investment(room.assignment.id, investor, room.teams[1].id, 50, 100)
            .await
            .unwrap();
        storage
            .record_investment(room.assignment.id, investor, room.teams[2].id, 25, 100)
            .await
            .unwrap();

        calculate(storage, &grading, &interest, room.assignment.id)
            .await
            .unwrap();

        let first = publish(storage, &grading, &interest, room.assignment.id)
            .await
            .unwrap();
        assert_eq!(first.published, 3);
        assert_eq!(first.interest_records, 2);

        let grades = storage
            .list_grades_by_assignment(room.assignment.id)
            .await
            .unwrap();
        assert!(grades.iter().all(|g| g.status == GradeStatus::Published));

        // 再次发布不会重复累计
        let second = publish(storage, &grading, &interest, room.assignment.id)
            .await
            .unwrap();
        assert_eq!(second.published, 0);
        assert_eq!(second.interest_records, 2);

        let records = storage
            .list_interest_records_by_student(investor)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        // 50 -> A 档 (high, 20%)，25 -> B 档 (median, 10%)
        let total: f64 = records.iter().map(|r| r.interest_earned).sum();
        assert!((total - 12.5).abs() < 1e-9);
    }
}
