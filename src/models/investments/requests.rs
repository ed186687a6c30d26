use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/investment.ts")]
pub struct InvestRequest {
    pub team_id: i64,
    pub tokens: i32,
}
