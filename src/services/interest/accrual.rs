//! 利息计算的纯函数部分

use std::collections::HashMap;

use crate::config::{GradingConfig, InterestConfig};
use crate::models::grades::entities::{Grade, GradeStatus};
use crate::models::interest::entities::NewInterestRecord;
use crate::models::investments::entities::Investment;
use crate::services::grades::scoring::{band_for, band_for_letter};

/// 为投向已发布成绩团队的每笔投资计算利息
pub fn interest_records(
    investments: &[Investment],
    grades: &[Grade],
    grading: &GradingConfig,
    interest: &InterestConfig,
) -> Vec<NewInterestRecord> {
    let tiers: HashMap<i64, String> = grades
        .iter()
        .filter(|g| g.status == GradeStatus::Published)
        .filter_map(|g| {
            // 按等级字母查档；找不到时退回按平均投资额定档
            band_for_letter(grading, &g.letter_grade)
                .or_else(|| band_for(grading, g.average_investment))
                .map(|band| (g.team_id, band.tier.clone()))
        })
        .collect();

    investments
        .iter()
        .filter_map(|investment| {
            let tier = tiers.get(&investment.team_id)?;
            let rate = interest.tier_rates.get(tier).copied().unwrap_or(0.0);

            Some(NewInterestRecord {
                student_id: investment.investor_id,
                team_id: investment.team_id,
                tokens_invested: investment.tokens,
                performance_tier: tier.clone(),
                interest_earned: f64::from(investment.tokens) * rate,
            })
        })
        .collect()
}

/// 利息总和换算为奖励比例，返回 (比例, 是否触及上限)
pub fn cumulative_bonus(total_interest: f64, config: &InterestConfig) -> (f64, bool) {
    let raw = total_interest / config.bonus_divisor;
    if raw > config.max_bonus {
        (config.max_bonus, true)
    } else {
        (raw, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn investment(investor_id: i64, team_id: i64, tokens: i32) -> Investment {
        Investment {
            id: 0,
            assignment_id: 1,
            investor_id,
            team_id,
            tokens,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn grade(team_id: i64, letter: &str, status: GradeStatus) -> Grade {
        Grade {
            id: team_id,
            assignment_id: 1,
            team_id,
            submission_id: team_id,
            average_investment: 0.0,
            letter_grade: letter.to_string(),
            percentage: 0.0,
            total_investments: 0,
            status,
            manual_override: false,
            original_letter_grade: None,
            original_percentage: None,
            reviewed_by: None,
            overridden_at: None,
            calculated_at: Utc::now(),
            published_at: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_interest_follows_tier_rate() {
        let investments = vec![
            investment(1, 10, 40),
            investment(1, 20, 30),
            investment(1, 30, 30),
        ];
        let grades = vec![
            grade(10, "A", GradeStatus::Published),
            grade(20, "B", GradeStatus::Published),
            grade(30, "D", GradeStatus::Published),
        ];

        let records = interest_records(
            &investments,
            &grades,
            &GradingConfig::default(),
            &InterestConfig::default(),
        );
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].performance_tier, "high");
        assert!((records[0].interest_earned - 8.0).abs() < 1e-9);
        assert!((records[1].interest_earned - 3.0).abs() < 1e-9);
        assert_eq!(records[2].interest_earned, 0.0);
    }

    #[test]
    fn test_draft_grades_earn_nothing() {
        let investments = vec![investment(1, 10, 40)];
        let grades = vec![grade(10, "A", GradeStatus::Draft)];

        let records = interest_records(
            &investments,
            &grades,
            &GradingConfig::default(),
            &InterestConfig::default(),
        );
        assert!(records.is_empty());
    }

    #[test]
    fn test_bonus_is_capped() {
        let config = InterestConfig::default();
        assert_eq!(cumulative_bonus(2500.0, &config), (0.20, true));
        assert_eq!(cumulative_bonus(20.0, &config), (0.20, false));
        let (bonus, capped) = cumulative_bonus(11.0, &config);
        assert!((bonus - 0.11).abs() < 1e-9);
        assert!(!capped);
    }
}
