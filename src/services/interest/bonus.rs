use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::InterestService;
use super::accrual::cumulative_bonus;
use crate::config::{AppConfig, InterestConfig};
use crate::errors::Result;
use crate::models::interest::responses::InterestBonusResponse;
use crate::models::{ApiResponse, error_response};
use crate::storage::Storage;

/// 学生跨作业的累计利息与奖励比例
pub async fn student_bonus(
    storage: &dyn Storage,
    config: &InterestConfig,
    student_id: i64,
) -> Result<InterestBonusResponse> {
    let records = storage.list_interest_records_by_student(student_id).await?;
    let total_interest: f64 = records.iter().map(|r| r.interest_earned).sum();
    let (bonus, capped) = cumulative_bonus(total_interest, config);

    Ok(InterestBonusResponse {
        student_id,
        total_interest,
        bonus,
        capped,
        records,
    })
}

pub async fn get_my_bonus(
    service: &InterestService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = &AppConfig::get().interest;

    match student_bonus(storage.as_ref(), config, student_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interest::entities::NewInterestRecord;
    use crate::storage::testing::memory_storage;

    #[tokio::test]
    async fn test_large_interest_sum_caps_at_max_bonus() {
        let storage = memory_storage().await;
        let records = (1..=5)
            .map(|team_id| NewInterestRecord {
                student_id: 42,
                team_id,
                tokens_invested: 50,
                performance_tier: "high".to_string(),
                interest_earned: 500.0,
            })
            .collect();
        storage.replace_interest_records(1, records).await.unwrap();

        let response = student_bonus(storage.as_ref(), &InterestConfig::default(), 42)
            .await
            .unwrap();
        assert_eq!(response.total_interest, 2500.0);
        assert_eq!(response.bonus, 0.20);
        assert!(response.capped);
        assert_eq!(response.records.len(), 5);
    }

    #[tokio::test]
    async fn test_student_without_records() {
        let storage = memory_storage().await;
        let response = student_bonus(storage.as_ref(), &InterestConfig::default(), 1)
            .await
            .unwrap();
        assert_eq!(response.bonus, 0.0);
        assert!(!response.capped);
    }
}
