use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::InvestmentService;
use crate::errors::{Result, TycoonError};
use crate::models::investments::{requests::InvestRequest, responses::InvestmentResponse};
use crate::models::{ApiResponse, error_response};
use crate::storage::Storage;

/// 单个团队的投资上限
pub const MAX_TOKENS_PER_TEAM: i32 = 50;
/// 每名学生在一个作业中的投资总额上限
pub const MAX_TOKENS_PER_ASSIGNMENT: i32 = 100;

/// 向被分配评审的团队投资，同时完成该评审任务
pub async fn record(
    storage: &dyn Storage,
    assignment_id: i64,
    investor_id: i64,
    req: InvestRequest,
    now: DateTime<Utc>,
) -> Result<InvestmentResponse> {
    if !(0..=MAX_TOKENS_PER_TEAM).contains(&req.tokens) {
        return Err(TycoonError::validation(format!(
            "单个团队的投资必须在 0 到 {MAX_TOKENS_PER_TEAM} 之间"
        )));
    }

    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| TycoonError::not_found(format!("作业 {assignment_id} 不存在")))?;

    if !assignment.evaluation_open(now) {
        return Err(TycoonError::validation("评审阶段未开启或已截止"));
    }

    let (investment, total_invested) = storage
        .record_investment(
            assignment_id,
            investor_id,
            req.team_id,
            req.tokens,
            MAX_TOKENS_PER_ASSIGNMENT,
        )
        .await?;

    info!(
        assignment_id,
        investor_id,
        team_id = investment.team_id,
        tokens = investment.tokens,
        "投资已记录"
    );

    Ok(InvestmentResponse {
        investment,
        total_invested,
        remaining_tokens: MAX_TOKENS_PER_ASSIGNMENT - total_invested,
    })
}

pub async fn invest(
    service: &InvestmentService,
    request: &HttpRequest,
    assignment_id: i64,
    investor_id: i64,
    req: InvestRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match record(storage.as_ref(), assignment_id, investor_id, req, Utc::now()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "投资成功"))),
        Err(e) => {
            warn!(assignment_id, investor_id, "投资失败: {}", e);
            Ok(error_response(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DistributionConfig;
    use crate::services::evaluations::distribute::distribute;
    use crate::storage::testing::{Classroom, classroom};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// 每名学生评审其余全部团队
    async fn distributed(sizes: &[usize]) -> Classroom {
        let room = classroom(sizes).await;
        let mut rng = StdRng::seed_from_u64(3);
        distribute(
            room.storage(),
            &DistributionConfig::default(),
            room.assignment.id,
            Some(sizes.len() as i32 - 1),
            room.teacher.id,
            &mut rng,
        )
        .await
        .unwrap();
        room
    }

    fn req(team_id: i64, tokens: i32) -> InvestRequest {
        InvestRequest { team_id, tokens }
    }

    #[tokio::test]
    async fn test_more_than_fifty_tokens_rejected() {
        let room = distributed(&[1, 1, 1]).await;
        let investor = room.member(0, 0);

        let err = record(room.storage(), room.assignment.id, investor, req(room.teams[1].id, 51), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, TycoonError::Validation(_)));

        let err = record(room.storage(), room.assignment.id, investor, req(room.teams[1].id, -1), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, TycoonError::Validation(_)));
    }

    #[tokio::test]
    async fn test_total_over_hundred_rejected() {
        let room = distributed(&[1, 1, 1, 1]).await;
        let investor = room.member(0, 0);

        for (team, tokens) in [(1, 50), (2, 40)] {
            record(room.storage(), room.assignment.id, investor, req(room.teams[team].id, tokens), Utc::now())
                .await
                .unwrap();
        }

        let err = record(room.storage(), room.assignment.id, investor, req(room.teams[3].id, 11), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, TycoonError::Validation(_)));

        let response = record(room.storage(), room.assignment.id, investor, req(room.teams[3].id, 10), Utc::now())
            .await
            .unwrap();
        assert_eq!(response.total_invested, 100);
        assert_eq!(response.remaining_tokens, 0);
    }

    #[tokio::test]
    async fn test_cannot_invest_in_own_team() {
        let room = distributed(&[2, 2]).await;
        let investor = room.member(0, 0);

        let err = record(room.storage(), room.assignment.id, investor, req(room.teams[0].id, 10), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, TycoonError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_closed_evaluation_phase() {
        // 未分发，评审阶段未开启
        let room = classroom(&[1, 1]).await;
        let err = record(room.storage(), room.assignment.id, room.member(0, 0), req(room.teams[1].id, 10), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, TycoonError::Validation(_)));
    }
}
