use serde::Deserialize;
use ts_rs::TS;

/// 手动覆盖成绩请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct OverrideGradeRequest {
    pub letter_grade: String,
    pub percentage: f64,
}
