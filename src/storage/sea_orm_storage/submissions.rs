use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{Result, TycoonError};
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 获取团队在作业下的提交
    pub async fn get_team_submission_impl(
        &self,
        assignment_id: i64,
        team_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::TeamId.eq(team_id))
            .one(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 创建或更新提交，每个 (作业, 团队) 仅保留一条
    pub async fn upsert_submission_impl(
        &self,
        assignment_id: i64,
        team_id: i64,
        submitted_by: i64,
        content: String,
        status: SubmissionStatus,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();
        let submitted_at = (status == SubmissionStatus::Submitted).then_some(now);

        let existing = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::TeamId.eq(team_id))
            .one(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询提交失败: {e}")))?;

        let result = match existing {
            Some(model) => {
                let mut active: ActiveModel = model.into();
                active.submitted_by = Set(submitted_by);
                active.content = Set(content);
                active.status = Set(status.to_string());
                active.submitted_at = Set(submitted_at);
                active.updated_at = Set(now);
                active
                    .update(&self.db)
                    .await
                    .map_err(|e| TycoonError::database_operation(format!("更新提交失败: {e}")))?
            }
            None => ActiveModel {
                assignment_id: Set(assignment_id),
                team_id: Set(team_id),
                submitted_by: Set(submitted_by),
                content: Set(content),
                status: Set(status.to_string()),
                submitted_at: Set(submitted_at),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("创建提交失败: {e}")))?,
        };

        Ok(result.into_submission())
    }

    /// 列出作业下已正式提交的提交
    pub async fn list_submitted_submissions_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::Status.eq(SubmissionStatus::Submitted.to_string()))
            .order_by_asc(Column::TeamId)
            .all(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_submission()).collect())
    }
}
