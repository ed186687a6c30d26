use serde::Deserialize;
use ts_rs::TS;

use super::entities::SubmissionStatus;

/// 提交作业请求，`status` 缺省为 submitted
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitRequest {
    pub content: String,
    pub status: Option<SubmissionStatus>,
}
