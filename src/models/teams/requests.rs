use serde::Deserialize;
use ts_rs::TS;

/// 创建团队请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/team.ts")]
pub struct CreateTeamRequest {
    pub name: String,
    pub member_ids: Vec<i64>,
}
