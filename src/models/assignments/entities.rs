use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    // 唯一 ID
    pub id: i64,
    // 关联的课程 ID
    pub course_id: i64,
    // 作业标题
    pub title: String,
    // 作业描述
    pub description: Option<String>,
    // 提交截止时间
    pub submission_due_at: Option<DateTime<Utc>>,
    // 评审截止时间
    pub evaluation_due_at: Option<DateTime<Utc>>,
    // 评审阶段是否开启（分发完成后置为 true）
    pub is_evaluation_active: bool,
    // 每名学生需要评审的团队数
    pub evaluations_per_student: i32,
    // 创建者 ID
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    /// 当前时间是否已过提交截止时间
    pub fn submission_closed(&self, now: DateTime<Utc>) -> bool {
        self.submission_due_at.is_some_and(|due| now > due)
    }

    /// 当前是否允许投资（评审阶段开启且未过评审截止时间）
    pub fn evaluation_open(&self, now: DateTime<Utc>) -> bool {
        self.is_evaluation_active && !self.evaluation_due_at.is_some_and(|due| now > due)
    }
}
