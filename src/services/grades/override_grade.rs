use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::GradeService;
use super::scoring::band_for_letter;
use crate::config::{AppConfig, GradingConfig, InterestConfig};
use crate::errors::{Result, TycoonError};
use crate::models::grades::{entities::Grade, requests::OverrideGradeRequest};
use crate::models::{ApiResponse, error_response};
use crate::services::interest::accrue::accrue_interest;
use crate::storage::Storage;

/// 人工覆盖成绩，之后的重新计算不会改写它
///
/// 已发布成绩的等级变化会立即反映到利息档位上。
pub async fn apply_override(
    storage: &dyn Storage,
    config: &GradingConfig,
    interest: &InterestConfig,
    grade_id: i64,
    reviewed_by: i64,
    req: OverrideGradeRequest,
) -> Result<Grade> {
    if !(0.0..=100.0).contains(&req.percentage) {
        return Err(TycoonError::validation("百分比必须在 0 到 100 之间"));
    }

    let letter = req.letter_grade.trim().to_string();
    if band_for_letter(config, &letter).is_none() {
        return Err(TycoonError::validation(format!("未知的等级: {letter}")));
    }

    let grade = storage
        .override_grade(grade_id, letter, req.percentage, reviewed_by)
        .await?
        .ok_or_else(|| TycoonError::not_found(format!("成绩 {grade_id} 不存在")))?;

    accrue_interest(storage, config, interest, grade.assignment_id).await?;

    info!(
        grade_id,
        reviewed_by,
        letter = %grade.letter_grade,
        "成绩已人工覆盖"
    );

    Ok(grade)
}

pub async fn override_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: i64,
    reviewed_by: i64,
    req: OverrideGradeRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = AppConfig::get();

    match apply_override(
        storage.as_ref(),
        &config.grading,
        &config.interest,
        grade_id,
        reviewed_by,
        req,
    )
    .await
    {
        Ok(grade) => Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "成绩已覆盖"))),
        Err(e) => {
            warn!(grade_id, "覆盖成绩失败: {}", e);
            Ok(error_response(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::entities::NewEvaluationAssignment;
    use crate::models::grades::entities::{CalculatedGrade, GradeWrite};
    use crate::services::grades::{calculate::calculate, publish::publish};
    use crate::storage::testing::classroom;

    #[tokio::test]
    async fn test_override_validation() {
        let room = classroom(&[1, 1]).await;
        let config = GradingConfig::default();
        let interest = InterestConfig::default();

        let written = room
            .storage()
            .save_calculated_grade(
                room.assignment.id,
                CalculatedGrade {
                    team_id: room.teams[0].id,
                    submission_id: 1,
                    average_investment: 5.0,
                    letter_grade: "D".to_string(),
                    percentage: 65.0,
                    total_investments: 2,
                },
            )
        .await
        .unwrap();
        let GradeWrite::Written(grade) = written else {
            panic!("expected written grade");
        };

        let too_high = OverrideGradeRequest {
            letter_grade: "A".to_string(),
            percentage: 101.0,
        };
        let err = apply_override(
            room.storage(),
            &config,
            &interest,
            grade.id,
            room.teacher.id,
            too_high,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TycoonError::Validation(_)));

        let unknown = OverrideGradeRequest {
            letter_grade: "Z".to_string(),
            percentage: 50.0,
        };
        let err = apply_override(
            room.storage(),
            &config,
            &interest,
            grade.id,
            room.teacher.id,
            unknown,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TycoonError::Validation(_)));

        let missing = OverrideGradeRequest {
            letter_grade: "B".to_string(),
            percentage: 85.0,
        };
        let err = apply_override(
            room.storage(),
            &config,
            &interest,
            999,
            room.teacher.id,
            missing,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TycoonError::NotFound(_)));

        let ok = OverrideGradeRequest {
            letter_grade: " B ".to_string(),
            percentage: 86.0,
        };
        let grade = apply_override(
            room.storage(),
            &config,
            &interest,
            grade.id,
            room.teacher.id,
            ok,
        )
        .await
        .unwrap();
        assert_eq!(grade.letter_grade, "B");
        assert_eq!(grade.original_letter_grade.as_deref(), Some("D"));
        assert_eq!(grade.original_percentage, Some(65.0));
    }

    #[tokio::test]
    async fn test_override_moves_published_interest_tier() {
        let room = classroom(&[1, 1]).await;
        let storage = room.storage();
        let config = GradingConfig::default();
        let interest = InterestConfig::default();

        let investor = room.member(0, 0);
        let target = room.teams[1].id;
        let submission = storage
            .get_team_submission(room.assignment.id, target)
            .await
            .unwrap()
            .unwrap();
        storage
            .create_evaluation_distribution(
                room.assignment.id,
                1,
                room.teacher.id,
                vec![NewEvaluationAssignment {
                    evaluator_id: investor,
                    team_id: target,
                    submission_id: submission.id,
                }],
            )
        .await
        .unwrap();
        storage
            .record_investment(room.assignment.id, investor, target, 50, 100)
            .await
            .unwrap();

        calculate(storage, &config, &interest, room.assignment.id)
            .await
            .unwrap();
        publish(storage, &config, &interest, room.assignment.id)
            .await
            .unwrap();

        let grade = storage
            .list_grades_by_assignment(room.assignment.id)
            .await
            .unwrap()
            .into_iter()
            .find(|g| g.team_id == target)
            .unwrap();
        let lowered = OverrideGradeRequest {
            letter_grade: "D".to_string(),
            percentage: 65.0,
        };
        apply_override(storage, &config, &interest, grade.id, room.teacher.id, lowered)
            .await
            .unwrap();

        let records = storage
            .list_interest_records_by_student(investor)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].performance_tier, "low");
        assert_eq!(records[0].interest_earned, 0.0);
    }
}
