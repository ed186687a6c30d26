use std::sync::Arc;

use crate::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    evaluations::entities::{EvaluationAssignment, EvaluationDistribution, NewEvaluationAssignment},
    grades::entities::{CalculatedGrade, Grade, GradeWrite},
    interest::entities::{InterestRecord, NewInterestRecord},
    investments::entities::Investment,
    submissions::entities::{Submission, SubmissionStatus},
    teams::{entities::Team, requests::CreateTeamRequest},
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[cfg(test)]
pub(crate) mod testing;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;

    /// 作业管理方法
    // 创建作业
    async fn create_assignment(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
        evaluations_per_student: i32,
    ) -> Result<Assignment>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;

    /// 团队管理方法
    // 创建团队及其成员（同一作业中学生只能属于一个团队）
    async fn create_team(&self, assignment: &Assignment, req: CreateTeamRequest) -> Result<Team>;
    // 列出作业下的团队
    async fn list_teams_by_assignment(&self, assignment_id: i64) -> Result<Vec<Team>>;
    // 获取学生在作业中的团队
    async fn get_user_team_for_assignment(
        &self,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<Option<Team>>;

    /// 提交管理方法
    // 获取团队的提交
    async fn get_team_submission(
        &self,
        assignment_id: i64,
        team_id: i64,
    ) -> Result<Option<Submission>>;
    // 创建或更新团队的提交
    async fn upsert_submission(
        &self,
        assignment_id: i64,
        team_id: i64,
        submitted_by: i64,
        content: String,
        status: SubmissionStatus,
    ) -> Result<Submission>;
    // 列出作业下状态为 submitted 的提交
    async fn list_submitted_submissions(&self, assignment_id: i64) -> Result<Vec<Submission>>;

    /// 评审分发方法
    // 原子写入分发标记、全部评审任务并开启评审阶段；已分发时返回 AlreadyDistributed
    async fn create_evaluation_distribution(
        &self,
        assignment_id: i64,
        evaluations_per_student: i32,
        distributed_by: i64,
        rows: Vec<NewEvaluationAssignment>,
    ) -> Result<EvaluationDistribution>;
    // 获取分发标记
    async fn get_evaluation_distribution(
        &self,
        assignment_id: i64,
    ) -> Result<Option<EvaluationDistribution>>;
    // 列出评审任务，可按评审人过滤
    async fn list_evaluation_assignments(
        &self,
        assignment_id: i64,
        evaluator_id: Option<i64>,
    ) -> Result<Vec<EvaluationAssignment>>;

    /// 投资方法
    // 在事务中写入投资并完成对应评审任务，返回投资及该学生本作业已投总额
    async fn record_investment(
        &self,
        assignment_id: i64,
        investor_id: i64,
        team_id: i64,
        tokens: i32,
        max_total: i32,
    ) -> Result<(Investment, i32)>;
    // 列出来自已完成评审的投资
    async fn list_completed_investments(&self, assignment_id: i64) -> Result<Vec<Investment>>;

    /// 成绩方法
    // 写入计算成绩；已人工覆盖的成绩保持不变
    async fn save_calculated_grade(
        &self,
        assignment_id: i64,
        grade: CalculatedGrade,
    ) -> Result<GradeWrite>;
    // 列出作业成绩
    async fn list_grades_by_assignment(&self, assignment_id: i64) -> Result<Vec<Grade>>;
    // 通过ID获取成绩
    async fn get_grade_by_id(&self, grade_id: i64) -> Result<Option<Grade>>;
    // 人工覆盖成绩
    async fn override_grade(
        &self,
        grade_id: i64,
        letter_grade: String,
        percentage: f64,
        reviewed_by: i64,
    ) -> Result<Option<Grade>>;
    // 发布作业下的全部草稿成绩，返回发布数量
    async fn publish_grades(&self, assignment_id: i64) -> Result<u64>;

    /// 利息方法
    // 重建作业的利息记录（删除后插入，同一事务）
    async fn replace_interest_records(
        &self,
        assignment_id: i64,
        records: Vec<NewInterestRecord>,
    ) -> Result<u64>;
    // 列出学生的全部利息记录
    async fn list_interest_records_by_student(&self, student_id: i64)
    -> Result<Vec<InterestRecord>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
