//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod evaluations;
mod grades;
mod interest;
mod investments;
mod submissions;
mod teams;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, TycoonError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| TycoonError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| TycoonError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| TycoonError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| TycoonError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(TycoonError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 内存 SQLite，供单元测试使用
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);

        let db = Database::connect(opt)
            .await
            .map_err(|e| TycoonError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Migrator::up(&db, None)
            .await
            .map_err(|e| TycoonError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
        evaluations_per_student: i32,
    ) -> Result<Assignment> {
        self.create_assignment_impl(created_by, req, evaluations_per_student)
            .await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    // 团队模块
    async fn create_team(&self, assignment: &Assignment, req: CreateTeamRequest) -> Result<Team> {
        self.create_team_impl(assignment, req).await
    }

    async fn list_teams_by_assignment(&self, assignment_id: i64) -> Result<Vec<Team>> {
        self.list_teams_by_assignment_impl(assignment_id).await
    }

    async fn get_user_team_for_assignment(
        &self,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<Option<Team>> {
        self.get_user_team_for_assignment_impl(assignment_id, user_id)
            .await
    }

    // 提交模块
    async fn get_team_submission(
        &self,
        assignment_id: i64,
        team_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_team_submission_impl(assignment_id, team_id).await
    }

    async fn upsert_submission(
        &self,
        assignment_id: i64,
        team_id: i64,
        submitted_by: i64,
        content: String,
        status: SubmissionStatus,
    ) -> Result<Submission> {
        self.upsert_submission_impl(assignment_id, team_id, submitted_by, content, status)
            .await
    }

    async fn list_submitted_submissions(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        self.list_submitted_submissions_impl(assignment_id).await
    }

    // 评审模块
    async fn create_evaluation_distribution(
        &self,
        assignment_id: i64,
        evaluations_per_student: i32,
        distributed_by: i64,
        rows: Vec<NewEvaluationAssignment>,
    ) -> Result<EvaluationDistribution> {
        self.create_evaluation_distribution_impl(
            assignment_id,
            evaluations_per_student,
            distributed_by,
            rows,
        )
        .await
    }

    async fn get_evaluation_distribution(
        &self,
        assignment_id: i64,
    ) -> Result<Option<EvaluationDistribution>> {
        self.get_evaluation_distribution_impl(assignment_id).await
    }

    async fn list_evaluation_assignments(
        &self,
        assignment_id: i64,
        evaluator_id: Option<i64>,
    ) -> Result<Vec<EvaluationAssignment>> {
        self.list_evaluation_assignments_impl(assignment_id, evaluator_id)
            .await
    }

    // 投资模块
    async fn record_investment(
        &self,
        assignment_id: i64,
        investor_id: i64,
        team_id: i64,
        tokens: i32,
        max_total: i32,
    ) -> Result<(Investment, i32)> {
        self.record_investment_impl(assignment_id, investor_id, team_id, tokens, max_total)
            .await
    }

    async fn list_completed_investments(&self, assignment_id: i64) -> Result<Vec<Investment>> {
        self.list_completed_investments_impl(assignment_id).await
    }

    // 成绩模块
    async fn save_calculated_grade(
        &self,
        assignment_id: i64,
        grade: CalculatedGrade,
    ) -> Result<GradeWrite> {
        self.save_calculated_grade_impl(assignment_id, grade).await
    }

    async fn list_grades_by_assignment(&self, assignment_id: i64) -> Result<Vec<Grade>> {
        self.list_grades_by_assignment_impl(assignment_id).await
    }

    async fn get_grade_by_id(&self, grade_id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_id_impl(grade_id).await
    }

    async fn override_grade(
        &self,
        grade_id: i64,
        letter_grade: String,
        percentage: f64,
        reviewed_by: i64,
    ) -> Result<Option<Grade>> {
        self.override_grade_impl(grade_id, letter_grade, percentage, reviewed_by)
            .await
    }

    async fn publish_grades(&self, assignment_id: i64) -> Result<u64> {
        self.publish_grades_impl(assignment_id).await
    }

    // 利息模块
    async fn replace_interest_records(
        &self,
        assignment_id: i64,
        records: Vec<NewInterestRecord>,
    ) -> Result<u64> {
        self.replace_interest_records_impl(assignment_id, records)
            .await
    }

    async fn list_interest_records_by_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<InterestRecord>> {
        self.list_interest_records_by_student_impl(student_id).await
    }
}
