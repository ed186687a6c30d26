pub mod assignments;
pub mod common;
pub mod evaluations;
pub mod grades;
pub mod interest;
pub mod investments;
pub mod submissions;
pub mod teams;
pub mod users;

pub use common::response::{ApiResponse, error_response};

use crate::errors::TycoonError;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码（随响应体的 `code` 字段返回）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 用户
    UserAlreadyExists = 2001,

    // 评审分发
    AlreadyDistributed = 4000,
    InsufficientTeams = 4001,
}

impl From<&TycoonError> for ErrorCode {
    fn from(err: &TycoonError) -> Self {
        match err {
            TycoonError::Validation(_) | TycoonError::DateParse(_) => ErrorCode::ValidationFailed,
            TycoonError::NotFound(_) => ErrorCode::NotFound,
            TycoonError::Authentication(_) => ErrorCode::Unauthorized,
            TycoonError::Authorization(_) => ErrorCode::Forbidden,
            TycoonError::AlreadyDistributed(_) => ErrorCode::AlreadyDistributed,
            TycoonError::InsufficientTeams(_) => ErrorCode::InsufficientTeams,
            TycoonError::DatabaseConfig(_)
            | TycoonError::DatabaseConnection(_)
            | TycoonError::DatabaseOperation(_)
            | TycoonError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}
