use serde::Serialize;
use ts_rs::TS;

use super::entities::Investment;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/investment.ts")]
pub struct InvestmentResponse {
    pub investment: Investment,
    // 本作业内已投出的代币总数
    pub total_invested: i32,
    pub remaining_tokens: i32,
}
