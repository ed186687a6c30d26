use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::GradeService;
use super::scoring::{band_for, grade_stats, trimmed_mean};
use crate::config::{AppConfig, GradingConfig, InterestConfig};
use crate::errors::{Result, TycoonError};
use crate::models::grades::{
    entities::{CalculatedGrade, GradeWrite},
    responses::GradeCalculationResponse,
};
use crate::models::{ApiResponse, error_response};
use crate::services::interest::accrue::accrue_interest;
use crate::storage::Storage;

/// 根据已完成评审的投资重新计算作业下所有团队的成绩
///
/// 每次都从当前全部投资重新计算，人工覆盖过的成绩保持不变。
/// 重新计算会把成绩退回草稿，利息记录随之重建。
pub async fn calculate(
    storage: &dyn Storage,
    config: &GradingConfig,
    interest: &InterestConfig,
    assignment_id: i64,
) -> Result<GradeCalculationResponse> {
    storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| TycoonError::not_found(format!("作业 {assignment_id} 不存在")))?;

    let submissions = storage.list_submitted_submissions(assignment_id).await?;

    let mut received: HashMap<i64, Vec<i32>> = HashMap::new();
    for investment in storage.list_completed_investments(assignment_id).await? {
        received
            .entry(investment.team_id)
            .or_default()
            .push(investment.tokens);
    }

    let mut grades = Vec::with_capacity(submissions.len());
    let mut skipped_overrides = Vec::new();

    for submission in submissions {
        let values = received.remove(&submission.team_id).unwrap_or_default();
        let (average, used) = trimmed_mean(&values);
        let band = band_for(config, average)
            .ok_or_else(|| TycoonError::validation("成绩分档配置为空"))?;

        let calculated = CalculatedGrade {
            team_id: submission.team_id,
            submission_id: submission.id,
            average_investment: average,
            letter_grade: band.letter.clone(),
            percentage: band.percentage,
            total_investments: used,
        };

        match storage.save_calculated_grade(assignment_id, calculated).await? {
            GradeWrite::Written(grade) => grades.push(grade),
            GradeWrite::SkippedOverride(grade) => skipped_overrides.push(grade.team_id),
        }
    }

    let stats = grade_stats(&storage.list_grades_by_assignment(assignment_id).await?);
    let interest_records = accrue_interest(storage, config, interest, assignment_id).await?;

    info!(
        assignment_id,
        calculated = grades.len(),
        skipped = skipped_overrides.len(),
        interest_records,
        "成绩计算完成"
    );

    Ok(GradeCalculationResponse {
        assignment_id,
        grades,
        skipped_overrides,
        stats,
    })
}

pub async fn calculate_grades(
    service: &GradeService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = AppConfig::get();

    match calculate(storage.as_ref(), &config.grading, &config.interest, assignment_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "成绩计算完成"))),
        Err(e) => {
            warn!(assignment_id, "成绩计算失败: {}", e);
            Ok(error_response(&e))
        }
    }
}
