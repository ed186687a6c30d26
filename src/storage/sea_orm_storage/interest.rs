use super::SeaOrmStorage;
use crate::entity::interest_records::{ActiveModel, Column, Entity as InterestRecords};
use crate::errors::{Result, TycoonError};
use crate::models::interest::entities::{InterestRecord, NewInterestRecord};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};

impl SeaOrmStorage {
    /// 重建作业的利息记录
    pub async fn replace_interest_records_impl(
        &self,
        assignment_id: i64,
        records: Vec<NewInterestRecord>,
    ) -> Result<u64> {
        let count = records.len() as u64;
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TycoonError::database_operation(format!("开启事务失败: {e}")))?;

        InterestRecords::delete_many()
            .filter(Column::AssignmentId.eq(assignment_id))
            .exec(&txn)
            .await
            .map_err(|e| TycoonError::database_operation(format!("清理利息记录失败: {e}")))?;

        if !records.is_empty() {
            let models = records.into_iter().map(|r| ActiveModel {
                student_id: Set(r.student_id),
                assignment_id: Set(assignment_id),
                team_id: Set(r.team_id),
                tokens_invested: Set(r.tokens_invested),
                performance_tier: Set(r.performance_tier),
                interest_earned: Set(r.interest_earned),
                created_at: Set(now),
                ..Default::default()
            });

            InterestRecords::insert_many(models)
                .exec(&txn)
                .await
                .map_err(|e| TycoonError::database_operation(format!("写入利息记录失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| TycoonError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(count)
    }

    /// 列出学生的利息记录
    pub async fn list_interest_records_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<InterestRecord>> {
        let result = InterestRecords::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::AssignmentId)
            .order_by_asc(Column::TeamId)
            .all(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询利息记录失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_interest_record()).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::models::interest::entities::NewInterestRecord;
    use crate::storage::Storage;
    use crate::storage::testing::memory_storage;

    fn record(student_id: i64, team_id: i64, interest: f64) -> NewInterestRecord {
        NewInterestRecord {
            student_id,
            team_id,
            tokens_invested: 10,
            performance_tier: "high".to_string(),
            interest_earned: interest,
        }
    }

    #[tokio::test]
    async fn test_replace_is_idempotent() {
        let storage = memory_storage().await;

        let records = vec![record(7, 1, 2.0), record(7, 2, 4.0), record(8, 1, 2.0)];
        assert_eq!(
            storage.replace_interest_records(1, records.clone()).await.unwrap(),
            3
        );
        storage.replace_interest_records(1, records).await.unwrap();

        let mine = storage.list_interest_records_by_student(7).await.unwrap();
        assert_eq!(mine.len(), 2);

        // 其他作业的记录不受影响
        storage
            .replace_interest_records(2, vec![record(7, 3, 1.0)])
            .await
            .unwrap();
        storage.replace_interest_records(1, Vec::new()).await.unwrap();
        let mine = storage.list_interest_records_by_student(7).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].assignment_id, 2);
    }
}
