use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 单个投资人对单个团队的投资（每对至多一条）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/investment.ts")]
pub struct Investment {
    pub id: i64,
    pub assignment_id: i64,
    pub investor_id: i64,
    pub team_id: i64,
    pub tokens: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
