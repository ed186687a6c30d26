use std::collections::HashSet;

use super::SeaOrmStorage;
use crate::entity::evaluation_assignments::{
    ActiveModel as EvaluationAssignmentActiveModel, Column as EvaluationAssignmentColumn,
    Entity as EvaluationAssignments,
};
use crate::entity::investments::{ActiveModel, Column, Entity as Investments};
use crate::errors::{Result, TycoonError};
use crate::models::{evaluations::entities::EvaluationStatus, investments::entities::Investment};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    TransactionTrait,
};

/// 投资人在该作业下的全部评审任务，加排他行锁
///
/// 同一投资人的并发投资在这些行上串行化，总额校验读到的是已提交的最新投资。
/// SQLite 不支持行锁，由其单写者事务保证。
fn investor_evaluations_for_update(
    assignment_id: i64,
    investor_id: i64,
) -> Select<EvaluationAssignments> {
    EvaluationAssignments::find()
        .filter(EvaluationAssignmentColumn::AssignmentId.eq(assignment_id))
        .filter(EvaluationAssignmentColumn::EvaluatorId.eq(investor_id))
        .order_by_asc(EvaluationAssignmentColumn::Id)
        .lock_exclusive()
}

impl SeaOrmStorage {
    /// 记录投资
    ///
    /// 校验评审任务归属与总额上限、写入投资、完成评审任务在同一事务内完成。
    pub async fn record_investment_impl(
        &self,
        assignment_id: i64,
        investor_id: i64,
        team_id: i64,
        tokens: i32,
        max_total: i32,
    ) -> Result<(Investment, i32)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TycoonError::database_operation(format!("开启事务失败: {e}")))?;

        let evaluation = investor_evaluations_for_update(assignment_id, investor_id)
            .all(&txn)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询评审任务失败: {e}")))?
            .into_iter()
            .find(|e| e.team_id == team_id)
            .ok_or_else(|| TycoonError::authorization("未被分配评审该团队，无法投资"))?;

        let existing = Investments::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::InvestorId.eq(investor_id))
            .all(&txn)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询投资失败: {e}")))?;

        // 对同一团队的再次投资覆盖原值
        let others: i32 = existing
            .iter()
            .filter(|i| i.team_id != team_id)
            .map(|i| i.tokens)
            .sum();
        let total = others + tokens;
        if total > max_total {
            return Err(TycoonError::validation(format!(
                "投资总额 {total} 超出上限 {max_total}"
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let investment = match existing.into_iter().find(|i| i.team_id == team_id) {
            Some(model) => {
                let mut active: ActiveModel = model.into();
                active.tokens = Set(tokens);
                active.updated_at = Set(now);
                active.update(&txn).await
            }
            None => {
                ActiveModel {
                    assignment_id: Set(assignment_id),
                    investor_id: Set(investor_id),
                    team_id: Set(team_id),
                    tokens: Set(tokens),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
            }
        }
        .map_err(|e| TycoonError::database_operation(format!("写入投资失败: {e}")))?;

        let mut evaluation: EvaluationAssignmentActiveModel = evaluation.into();
        evaluation.status = Set(EvaluationStatus::Completed.to_string());
        evaluation.completed_at = Set(Some(now));
        evaluation
            .update(&txn)
            .await
            .map_err(|e| TycoonError::database_operation(format!("更新评审任务失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| TycoonError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((investment.into_investment(), total))
    }

    /// 列出来自已完成评审任务的投资
    pub async fn list_completed_investments_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Investment>> {
        let completed: HashSet<(i64, i64)> = EvaluationAssignments::find()
            .filter(EvaluationAssignmentColumn::AssignmentId.eq(assignment_id))
            .filter(EvaluationAssignmentColumn::Status.eq(EvaluationStatus::Completed.to_string()))
            .all(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询评审任务失败: {e}")))?
            .into_iter()
            .map(|e| (e.evaluator_id, e.team_id))
            .collect();

        let investments = Investments::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询投资失败: {e}")))?;

        Ok(investments
            .into_iter()
            .filter(|i| completed.contains(&(i.investor_id, i.team_id)))
            .map(|m| m.into_investment())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::investor_evaluations_for_update;
    use crate::errors::TycoonError;
    use crate::models::evaluations::entities::{EvaluationStatus, NewEvaluationAssignment};
    use crate::storage::Storage;
    use crate::storage::testing::{Classroom, classroom};
    use sea_orm::{DbBackend, QueryTrait};

    /// 第 0 队的第一名成员评审其余全部团队
    async fn assign_all(room: &Classroom) -> i64 {
        let storage = room.storage();
        let investor = room.member(0, 0);
        let submissions = storage
            .list_submitted_submissions(room.assignment.id)
            .await
            .unwrap();

        let rows = submissions
            .iter()
            .filter(|s| s.team_id != room.teams[0].id)
            .map(|s| NewEvaluationAssignment {
                evaluator_id: investor,
                team_id: s.team_id,
                submission_id: s.id,
            })
            .collect::<Vec<_>>();
        let k = rows.len() as i32;

        storage
            .create_evaluation_distribution(room.assignment.id, k, room.teacher.id, rows)
            .await
            .unwrap();
        investor
    }

    #[tokio::test]
    async fn test_investment_completes_evaluation() {
        let room = classroom(&[1, 1, 1]).await;
        let investor = assign_all(&room).await;
        let storage = room.storage();

        let (investment, total) = storage
            .record_investment(room.assignment.id, investor, room.teams[1].id, 30, 100)
            .await
            .unwrap();
        assert_eq!(investment.tokens, 30);
        assert_eq!(total, 30);

        let mine = storage
            .list_evaluation_assignments(room.assignment.id, Some(investor))
            .await
            .unwrap();
        let done = mine.iter().find(|e| e.team_id == room.teams[1].id).unwrap();
        assert_eq!(done.status, EvaluationStatus::Completed);
        assert!(done.completed_at.is_some());

        let completed = storage
            .list_completed_investments(room.assignment.id)
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
    }

    #[tokio::test]
    async fn test_reinvesting_replaces_previous_amount() {
        let room = classroom(&[1, 1, 1]).await;
        let investor = assign_all(&room).await;
        let storage = room.storage();

        storage
            .record_investment(room.assignment.id, investor, room.teams[1].id, 50, 100)
            .await
            .unwrap();
        storage
            .record_investment(room.assignment.id, investor, room.teams[2].id, 50, 100)
            .await
            .unwrap();

        // 超出总额
        let err = storage
            .record_investment(room.assignment.id, investor, room.teams[1].id, 51, 100)
            .await
            .unwrap_err();
        assert!(matches!(err, TycoonError::Validation(_)));

        let (investment, total) = storage
            .record_investment(room.assignment.id, investor, room.teams[1].id, 20, 100)
            .await
            .unwrap();
        assert_eq!(investment.tokens, 20);
        assert_eq!(total, 70);
    }

    #[tokio::test]
    async fn test_investing_without_assignment_is_forbidden() {
        let room = classroom(&[1, 1, 1]).await;
        assign_all(&room).await;
        let storage = room.storage();

        let outsider = room.member(1, 0);
        let err = storage
            .record_investment(room.assignment.id, outsider, room.teams[2].id, 10, 100)
            .await
            .unwrap_err();
        assert!(matches!(err, TycoonError::Authorization(_)));
    }

    #[test]
    fn test_total_check_locks_all_investor_rows() {
        let sql = investor_evaluations_for_update(3, 7)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.ends_with("FOR UPDATE"), "{sql}");
        assert!(sql.contains(r#""evaluator_id" = 7"#), "{sql}");
        // 不按团队过滤，锁住投资人的全部评审任务
        assert!(!sql.contains("team_id\" ="), "{sql}");
    }

    #[tokio::test]
    async fn test_concurrent_investments_respect_total() {
        let room = classroom(&[1, 1, 1]).await;
        let investor = assign_all(&room).await;
        let storage = room.storage();

        let (first, second) = tokio::join!(
            storage.record_investment(room.assignment.id, investor, room.teams[1].id, 60, 100),
            storage.record_investment(room.assignment.id, investor, room.teams[2].id, 60, 100),
        );
        assert_eq!(
            [first.is_ok(), second.is_ok()]
                .iter()
                .filter(|ok| **ok)
                .count(),
            1
        );

        let total: i32 = storage
            .list_completed_investments(room.assignment.id)
            .await
            .unwrap()
            .iter()
            .filter(|i| i.investor_id == investor)
            .map(|i| i.tokens)
            .sum();
        assert_eq!(total, 60);
    }
}
