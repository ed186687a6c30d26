use serde::Deserialize;
use ts_rs::TS;

/// 分发评审请求，缺省使用作业上配置的每人评审数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct DistributeEvaluationsRequest {
    pub evaluations_per_student: Option<i32>,
}
