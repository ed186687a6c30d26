use super::SeaOrmStorage;
use crate::entity::grades::{ActiveModel, Column, Entity as Grades, Model as GradeModel};
use crate::errors::{Result, TycoonError};
use crate::models::grades::entities::{CalculatedGrade, Grade, GradeStatus, GradeWrite};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr};

impl SeaOrmStorage {
    /// 写入计算得出的成绩
    ///
    /// 通过 `WHERE manual_override = false` 的条件更新与人工覆盖互斥，
    /// 覆盖检查与写入是同一条语句。
    pub async fn save_calculated_grade_impl(
        &self,
        assignment_id: i64,
        grade: CalculatedGrade,
    ) -> Result<GradeWrite> {
        if self.update_unlocked_grade(assignment_id, &grade).await? {
            return self.written_grade(assignment_id, grade.team_id).await;
        }

        match self.find_grade(assignment_id, grade.team_id).await? {
            Some(existing) if existing.manual_override => {
                Ok(GradeWrite::SkippedOverride(existing.into_grade()))
            }
            Some(_) => {
                // 行存在但条件更新未命中，说明其间被覆盖或删除，按当前状态重新判定
                self.retry_after_race(assignment_id, grade).await
            }
            None => {
                let now = chrono::Utc::now().timestamp();
                let inserted = ActiveModel {
                    assignment_id: Set(assignment_id),
                    team_id: Set(grade.team_id),
                    submission_id: Set(grade.submission_id),
                    average_investment: Set(grade.average_investment),
                    letter_grade: Set(grade.letter_grade.clone()),
                    percentage: Set(grade.percentage),
                    total_investments: Set(grade.total_investments),
                    status: Set(GradeStatus::Draft.to_string()),
                    manual_override: Set(false),
                    original_letter_grade: Set(None),
                    original_percentage: Set(None),
                    reviewed_by: Set(None),
                    overridden_at: Set(None),
                    calculated_at: Set(now),
                    published_at: Set(None),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await;

                match inserted {
                    Ok(model) => Ok(GradeWrite::Written(model.into_grade())),
                    // 并发插入命中唯一约束
                    Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                        self.retry_after_race(assignment_id, grade).await
                    }
                    Err(e) => Err(TycoonError::database_operation(format!(
                        "创建成绩失败: {e}"
                    ))),
                }
            }
        }
    }

    async fn retry_after_race(
        &self,
        assignment_id: i64,
        grade: CalculatedGrade,
    ) -> Result<GradeWrite> {
        if self.update_unlocked_grade(assignment_id, &grade).await? {
            return self.written_grade(assignment_id, grade.team_id).await;
        }

        match self.find_grade(assignment_id, grade.team_id).await? {
            Some(existing) => Ok(GradeWrite::SkippedOverride(existing.into_grade())),
            None => Err(TycoonError::database_operation(format!(
                "团队 {} 的成绩写入冲突",
                grade.team_id
            ))),
        }
    }

    /// 仅更新未被人工覆盖的成绩，返回是否命中
    async fn update_unlocked_grade(
        &self,
        assignment_id: i64,
        grade: &CalculatedGrade,
    ) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Grades::update_many()
            .col_expr(Column::SubmissionId, Expr::value(grade.submission_id))
            .col_expr(Column::AverageInvestment, Expr::value(grade.average_investment))
            .col_expr(Column::LetterGrade, Expr::value(grade.letter_grade.clone()))
            .col_expr(Column::Percentage, Expr::value(grade.percentage))
            .col_expr(Column::TotalInvestments, Expr::value(grade.total_investments))
            .col_expr(Column::Status, Expr::value(GradeStatus::Draft.to_string()))
            .col_expr(Column::PublishedAt, Expr::value(Option::<i64>::None))
            .col_expr(Column::CalculatedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::TeamId.eq(grade.team_id))
            .filter(Column::ManualOverride.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("更新成绩失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    async fn written_grade(&self, assignment_id: i64, team_id: i64) -> Result<GradeWrite> {
        self.find_grade(assignment_id, team_id)
            .await?
            .map(|m| GradeWrite::Written(m.into_grade()))
            .ok_or_else(|| TycoonError::not_found(format!("团队 {team_id} 的成绩不存在")))
    }

    async fn find_grade(&self, assignment_id: i64, team_id: i64) -> Result<Option<GradeModel>> {
        Grades::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::TeamId.eq(team_id))
            .one(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询成绩失败: {e}")))
    }

    /// 列出作业下的全部成绩
    pub async fn list_grades_by_assignment_impl(&self, assignment_id: i64) -> Result<Vec<Grade>> {
        let result = Grades::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::TeamId)
            .all(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_grade()).collect())
    }

    /// 通过 ID 获取成绩
    pub async fn get_grade_by_id_impl(&self, grade_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(grade_id)
            .one(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 人工覆盖成绩，首次覆盖时保留计算值
    pub async fn override_grade_impl(
        &self,
        grade_id: i64,
        letter_grade: String,
        percentage: f64,
        reviewed_by: i64,
    ) -> Result<Option<Grade>> {
        let existing = Grades::find_by_id(grade_id)
            .one(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询成绩失败: {e}")))?;

        let Some(model) = existing else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        let original_letter = model
            .original_letter_grade
            .clone()
            .unwrap_or_else(|| model.letter_grade.clone());
        let original_percentage = model.original_percentage.unwrap_or(model.percentage);

        let mut active: ActiveModel = model.into();
        active.letter_grade = Set(letter_grade);
        active.percentage = Set(percentage);
        active.manual_override = Set(true);
        active.original_letter_grade = Set(Some(original_letter));
        active.original_percentage = Set(Some(original_percentage));
        active.reviewed_by = Set(Some(reviewed_by));
        active.overridden_at = Set(Some(now));
        active.updated_at = Set(now);

        let result = active
            .update(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("覆盖成绩失败: {e}")))?;

        Ok(Some(result.into_grade()))
    }

    /// 发布作业下全部草稿成绩
    pub async fn publish_grades_impl(&self, assignment_id: i64) -> Result<u64> {
        let now = chrono::Utc::now().timestamp();

        let result = Grades::update_many()
            .col_expr(Column::Status, Expr::value(GradeStatus::Published.to_string()))
            .col_expr(Column::PublishedAt, Expr::value(Some(now)))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::Status.eq(GradeStatus::Draft.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("发布成绩失败: {e}")))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::grades::entities::{CalculatedGrade, GradeStatus, GradeWrite};
    use crate::storage::Storage;
    use crate::storage::testing::classroom;

    fn calculated(team_id: i64, submission_id: i64, average: f64, letter: &str) -> CalculatedGrade {
        CalculatedGrade {
            team_id,
            submission_id,
            average_investment: average,
            letter_grade: letter.to_string(),
            percentage: 75.0,
            total_investments: 1,
        }
    }

    #[tokio::test]
    async fn test_override_survives_recalculation() {
        let room = classroom(&[1, 1]).await;
        let storage = room.storage();
        let team = room.teams[0].id;
        let submission = storage
            .get_team_submission(room.assignment.id, team)
            .await
            .unwrap()
            .unwrap();

        let first = storage
            .save_calculated_grade(room.assignment.id, calculated(team, submission.id, 12.0, "C"))
            .await
            .unwrap();
        let GradeWrite::Written(grade) = first else {
            panic!("expected written grade");
        };

        let overridden = storage
            .override_grade(grade.id, "A".to_string(), 98.0, room.teacher.id)
            .await
            .unwrap()
            .unwrap();
        assert!(overridden.manual_override);
        assert_eq!(overridden.original_letter_grade.as_deref(), Some("C"));
        assert_eq!(overridden.reviewed_by, Some(room.teacher.id));

        let second = storage
            .save_calculated_grade(room.assignment.id, calculated(team, submission.id, 3.0, "D"))
            .await
            .unwrap();
        let GradeWrite::SkippedOverride(kept) = second else {
            panic!("override must be kept");
        };
        assert_eq!(kept.letter_grade, "A");
        assert_eq!(kept.percentage, 98.0);

        // 二次覆盖保留最初的计算值
        let again = storage
            .override_grade(grade.id, "B".to_string(), 88.0, room.teacher.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.original_letter_grade.as_deref(), Some("C"));
    }

    #[tokio::test]
    async fn test_recalculation_overwrites_and_publish_flips_status() {
        let room = classroom(&[1, 1]).await;
        let storage = room.storage();
        let team = room.teams[1].id;

        storage
            .save_calculated_grade(room.assignment.id, calculated(team, 1, 12.0, "C"))
            .await
            .unwrap();
        storage
            .save_calculated_grade(room.assignment.id, calculated(team, 1, 25.0, "B"))
            .await
            .unwrap();

        let grades = storage
            .list_grades_by_assignment(room.assignment.id)
            .await
            .unwrap();
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].letter_grade, "B");
        assert_eq!(grades[0].status, GradeStatus::Draft);

        assert_eq!(storage.publish_grades(room.assignment.id).await.unwrap(), 1);
        let published = storage.get_grade_by_id(grades[0].id).await.unwrap().unwrap();
        assert_eq!(published.status, GradeStatus::Published);
        assert!(published.published_at.is_some());

        // 已无草稿
        assert_eq!(storage.publish_grades(room.assignment.id).await.unwrap(), 0);
    }
}
