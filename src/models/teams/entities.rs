use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/team.ts")]
pub struct Team {
    pub id: i64,
    pub assignment_id: i64,
    pub course_id: i64,
    pub name: String,
    // 成员学生 ID（顺序无意义）
    pub member_ids: Vec<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Team {
    pub fn has_member(&self, user_id: i64) -> bool {
        self.member_ids.contains(&user_id)
    }
}
