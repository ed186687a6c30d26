use serde::Deserialize;
use ts_rs::TS;

use super::entities::UserRole;

/// 创建用户请求（名册导入）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub display_name: Option<String>,
    pub role: UserRole,
}
