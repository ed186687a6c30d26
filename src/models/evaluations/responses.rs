use serde::Serialize;
use ts_rs::TS;

use super::entities::{EvaluationAssignment, EvaluationDistribution};

/// 单个团队被分配到的评审数
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct TeamLoad {
    pub team_id: i64,
    pub evaluations: i32,
}

/// 分发结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct DistributionResponse {
    pub distribution: EvaluationDistribution,
    pub team_loads: Vec<TeamLoad>,
}

/// 我的评审任务
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct MyEvaluationsResponse {
    pub items: Vec<EvaluationAssignment>,
    pub completed: i32,
    pub total: i32,
}
