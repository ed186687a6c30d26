use serde::Serialize;
use ts_rs::TS;

use super::entities::InterestRecord;

/// 学生利息汇总及换算的奖励比例
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/interest.ts")]
pub struct InterestBonusResponse {
    pub student_id: i64,
    pub total_interest: f64,
    pub bonus: f64,
    // 是否触及上限
    pub capped: bool,
    pub records: Vec<InterestRecord>,
}
