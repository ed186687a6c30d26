use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 投资利息记录，每个 (学生, 作业, 团队) 至多一条
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/interest.ts")]
pub struct InterestRecord {
    pub id: i64,
    pub student_id: i64,
    pub assignment_id: i64,
    pub team_id: i64,
    pub tokens_invested: i32,
    pub performance_tier: String,
    pub interest_earned: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInterestRecord {
    pub student_id: i64,
    pub team_id: i64,
    pub tokens_invested: i32,
    pub performance_tier: String,
    pub interest_earned: f64,
}
