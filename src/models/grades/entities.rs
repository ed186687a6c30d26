use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 成绩状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub enum GradeStatus {
    Draft,     // 草稿，仅教师可见
    Published, // 已发布
}

impl std::fmt::Display for GradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeStatus::Draft => write!(f, "draft"),
            GradeStatus::Published => write!(f, "published"),
        }
    }
}

impl std::str::FromStr for GradeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(GradeStatus::Draft),
            "published" => Ok(GradeStatus::Published),
            _ => Err(format!("Invalid grade status: {s}")),
        }
    }
}

/// 团队成绩，每个 (作业, 团队) 至多一条
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub assignment_id: i64,
    pub team_id: i64,
    pub submission_id: i64,
    pub average_investment: f64,
    pub letter_grade: String,
    pub percentage: f64,
    pub total_investments: i32,
    pub status: GradeStatus,
    // 被教师手动覆盖后，重新计算不再改写
    pub manual_override: bool,
    pub original_letter_grade: Option<String>,
    pub original_percentage: Option<f64>,
    pub reviewed_by: Option<i64>,
    pub overridden_at: Option<DateTime<Utc>>,
    pub calculated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// 计算得出的成绩，由存储层写入或因人工覆盖而跳过
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatedGrade {
    pub team_id: i64,
    pub submission_id: i64,
    pub average_investment: f64,
    pub letter_grade: String,
    pub percentage: f64,
    pub total_investments: i32,
}

/// 成绩写入结果
#[derive(Debug, Clone)]
pub enum GradeWrite {
    Written(Grade),
    SkippedOverride(Grade),
}
