use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 评审任务状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub enum EvaluationStatus {
    Assigned,  // 已分配
    Completed, // 已完成（已投资）
}

impl std::fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationStatus::Assigned => write!(f, "assigned"),
            EvaluationStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for EvaluationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assigned" => Ok(EvaluationStatus::Assigned),
            "completed" => Ok(EvaluationStatus::Completed),
            _ => Err(format!("Invalid evaluation status: {s}")),
        }
    }
}

/// 学生 -> 被评审团队 的一条评审任务
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationAssignment {
    pub id: i64,
    pub assignment_id: i64,
    pub evaluator_id: i64,
    pub team_id: i64,
    pub submission_id: i64,
    pub status: EvaluationStatus,
    pub assigned_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// 分发标记，每个作业至多一条
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationDistribution {
    pub id: i64,
    pub assignment_id: i64,
    pub evaluations_per_student: i32,
    pub total_assignments: i32,
    pub distributed_by: i64,
    pub distributed_at: DateTime<Utc>,
}

/// 待写入的评审任务（由分发规划产生）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvaluationAssignment {
    pub evaluator_id: i64,
    pub team_id: i64,
    pub submission_id: i64,
}
