use tracing::debug;

use super::accrual::interest_records;
use crate::config::{GradingConfig, InterestConfig};
use crate::errors::Result;
use crate::storage::Storage;

/// 重新计算作业的全部利息记录，返回写入数量
pub async fn accrue_interest(
    storage: &dyn Storage,
    grading: &GradingConfig,
    interest: &InterestConfig,
    assignment_id: i64,
) -> Result<u64> {
    let investments = storage.list_completed_investments(assignment_id).await?;
    let grades = storage.list_grades_by_assignment(assignment_id).await?;

    let records = interest_records(&investments, &grades, grading, interest);
    debug!(assignment_id, records = records.len(), "利息记录重建");

    storage.replace_interest_records(assignment_id, records).await
}
