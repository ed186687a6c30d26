use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::evaluation_assignments::{
    ActiveModel as EvaluationAssignmentActiveModel, Column as EvaluationAssignmentColumn,
    Entity as EvaluationAssignments,
};
use crate::entity::evaluation_distributions::{
    ActiveModel as DistributionActiveModel, Column as DistributionColumn,
    Entity as EvaluationDistributions,
};
use crate::errors::{Result, TycoonError};
use crate::models::evaluations::entities::{
    EvaluationAssignment, EvaluationDistribution, EvaluationStatus, NewEvaluationAssignment,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 原子地写入分发结果
    ///
    /// 先插入分发标记，其唯一约束保证同一作业只会分发一次；随后写入全部评审任务并开启评审阶段。
    /// 任一步失败都会随事务回滚，不留下部分数据。
    pub async fn create_evaluation_distribution_impl(
        &self,
        assignment_id: i64,
        evaluations_per_student: i32,
        distributed_by: i64,
        rows: Vec<NewEvaluationAssignment>,
    ) -> Result<EvaluationDistribution> {
        let now = chrono::Utc::now().timestamp();
        let total = i32::try_from(rows.len())
            .map_err(|_| TycoonError::validation("评审任务数量超出范围"))?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TycoonError::database_operation(format!("开启事务失败: {e}")))?;

        let marker = DistributionActiveModel {
            assignment_id: Set(assignment_id),
            evaluations_per_student: Set(evaluations_per_student),
            total_assignments: Set(total),
            distributed_by: Set(distributed_by),
            distributed_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                TycoonError::already_distributed(format!("作业 {assignment_id} 的评审已分发"))
            }
            _ => TycoonError::database_operation(format!("写入分发标记失败: {e}")),
        })?;

        if !rows.is_empty() {
            let models = rows.into_iter().map(|row| EvaluationAssignmentActiveModel {
                assignment_id: Set(assignment_id),
                evaluator_id: Set(row.evaluator_id),
                team_id: Set(row.team_id),
                submission_id: Set(row.submission_id),
                status: Set(EvaluationStatus::Assigned.to_string()),
                assigned_at: Set(now),
                completed_at: Set(None),
                ..Default::default()
            });

            EvaluationAssignments::insert_many(models)
                .exec(&txn)
                .await
                .map_err(|e| TycoonError::database_operation(format!("写入评审任务失败: {e}")))?;
        }

        Assignments::update_many()
            .col_expr(AssignmentColumn::IsEvaluationActive, Expr::value(true))
            .col_expr(AssignmentColumn::UpdatedAt, Expr::value(now))
            .filter(AssignmentColumn::Id.eq(assignment_id))
            .exec(&txn)
            .await
            .map_err(|e| TycoonError::database_operation(format!("开启评审阶段失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| TycoonError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(marker.into_distribution())
    }

    /// 获取分发标记
    pub async fn get_evaluation_distribution_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Option<EvaluationDistribution>> {
        let result = EvaluationDistributions::find()
            .filter(DistributionColumn::AssignmentId.eq(assignment_id))
            .one(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询分发标记失败: {e}")))?;

        Ok(result.map(|m| m.into_distribution()))
    }

    /// 列出评审任务
    pub async fn list_evaluation_assignments_impl(
        &self,
        assignment_id: i64,
        evaluator_id: Option<i64>,
    ) -> Result<Vec<EvaluationAssignment>> {
        let mut select = EvaluationAssignments::find()
            .filter(EvaluationAssignmentColumn::AssignmentId.eq(assignment_id));

        if let Some(evaluator_id) = evaluator_id {
            select = select.filter(EvaluationAssignmentColumn::EvaluatorId.eq(evaluator_id));
        }

        let result = select
            .order_by_asc(EvaluationAssignmentColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询评审任务失败: {e}")))?;

        Ok(result
            .into_iter()
            .map(|m| m.into_evaluation_assignment())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::TycoonError;
    use crate::models::evaluations::entities::NewEvaluationAssignment;
    use crate::storage::Storage;
    use crate::storage::testing::classroom;

    #[tokio::test]
    async fn test_distribution_marker_blocks_second_run() {
        let room = classroom(&[2, 2]).await;
        let storage = room.storage();
        let submissions = storage
            .list_submitted_submissions(room.assignment.id)
            .await
            .unwrap();

        let rows = vec![NewEvaluationAssignment {
            evaluator_id: room.member(0, 0),
            team_id: room.teams[1].id,
            submission_id: submissions[1].id,
        }];

        let marker = storage
            .create_evaluation_distribution(room.assignment.id, 1, room.teacher.id, rows.clone())
            .await
            .unwrap();
        assert_eq!(marker.total_assignments, 1);

        let assignment = storage
            .get_assignment_by_id(room.assignment.id)
            .await
            .unwrap()
            .unwrap();
        assert!(assignment.is_evaluation_active);

        let err = storage
            .create_evaluation_distribution(room.assignment.id, 1, room.teacher.id, rows)
            .await
            .unwrap_err();
        assert!(matches!(err, TycoonError::AlreadyDistributed(_)));

        let all = storage
            .list_evaluation_assignments(room.assignment.id, None)
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_distribution_leaves_nothing_behind() {
        let room = classroom(&[2, 2]).await;
        let storage = room.storage();

        // 重复的 (评审人, 团队) 触发唯一约束，整个事务回滚
        let duplicate = NewEvaluationAssignment {
            evaluator_id: room.member(0, 0),
            team_id: room.teams[1].id,
            submission_id: storage
                .get_team_submission(room.assignment.id, room.teams[1].id)
                .await
                .unwrap()
                .unwrap()
                .id,
        };

        let err = storage
            .create_evaluation_distribution(
                room.assignment.id,
                1,
                room.teacher.id,
                vec![duplicate.clone(), duplicate],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TycoonError::DatabaseOperation(_)));

        assert!(
            storage
                .get_evaluation_distribution(room.assignment.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .list_evaluation_assignments(room.assignment.id, None)
                .await
                .unwrap()
                .is_empty()
        );
        let assignment = storage
            .get_assignment_by_id(room.assignment.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!assignment.is_evaluation_active);
    }
}
