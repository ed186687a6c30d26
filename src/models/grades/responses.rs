use serde::Serialize;
use ts_rs::TS;

use super::entities::Grade;

/// 等级分布
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct LetterCount {
    pub letter_grade: String,
    pub count: i64,
}

/// 成绩统计
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeStats {
    pub count: i64,
    pub mean_percentage: Option<f64>,
    pub median_percentage: Option<f64>,
    pub distribution: Vec<LetterCount>,
}

/// 成绩计算结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeCalculationResponse {
    pub assignment_id: i64,
    pub grades: Vec<Grade>,
    // 因人工覆盖而保留原值的团队
    pub skipped_overrides: Vec<i64>,
    pub stats: GradeStats,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeListResponse {
    pub items: Vec<Grade>,
    pub stats: GradeStats,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct PublishGradesResponse {
    pub assignment_id: i64,
    pub published: i64,
    pub interest_records: i64,
}
