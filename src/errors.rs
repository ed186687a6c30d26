//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称和 HTTP 状态码。

use std::fmt;

use actix_web::http::StatusCode;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - http_status() 方法 - 返回对应的 HTTP 状态码
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_tycoon_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum TycoonError {
            $($variant(String),)*
        }

        impl TycoonError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(TycoonError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(TycoonError::$variant(_) => $type_name,)*
                }
            }

            /// 获取 HTTP 状态码
            pub fn http_status(&self) -> StatusCode {
                match self {
                    $(TycoonError::$variant(_) => StatusCode::$status,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(TycoonError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl TycoonError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        TycoonError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_tycoon_errors! {
    DatabaseConfig("E003", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E004", "Database Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseOperation("E005", "Database Operation Error", INTERNAL_SERVER_ERROR),
    Validation("E007", "Validation Error", BAD_REQUEST),
    NotFound("E008", "Resource Not Found", NOT_FOUND),
    Serialization("E009", "Serialization Error", INTERNAL_SERVER_ERROR),
    DateParse("E011", "Date Parse Error", BAD_REQUEST),
    Authentication("E012", "Authentication Error", UNAUTHORIZED),
    Authorization("E013", "Authorization Error", FORBIDDEN),
    AlreadyDistributed("E014", "Already Distributed", CONFLICT),
    InsufficientTeams("E015", "Insufficient Teams", UNPROCESSABLE_ENTITY),
}

impl TycoonError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TycoonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TycoonError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for TycoonError {
    fn from(err: sea_orm::DbErr) -> Self {
        TycoonError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TycoonError {
    fn from(err: serde_json::Error) -> Self {
        TycoonError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for TycoonError {
    fn from(err: chrono::ParseError) -> Self {
        TycoonError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TycoonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TycoonError::database_config("test").code(), "E003");
        assert_eq!(TycoonError::validation("test").code(), "E007");
        assert_eq!(TycoonError::authentication("test").code(), "E012");
        assert_eq!(TycoonError::already_distributed("test").code(), "E014");
        assert_eq!(TycoonError::insufficient_teams("test").code(), "E015");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            TycoonError::already_distributed("test").error_type(),
            "Already Distributed"
        );
        assert_eq!(
            TycoonError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_http_status() {
        assert_eq!(
            TycoonError::validation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TycoonError::already_distributed("x").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            TycoonError::insufficient_teams("x").http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            TycoonError::authorization("x").http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            TycoonError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_db_err_maps_to_database_operation() {
        let err: TycoonError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("boom"));
    }

    #[test]
    fn test_format_simple() {
        let err = TycoonError::insufficient_teams("need 5 teams");
        let formatted = err.format_simple();
        assert!(formatted.contains("Insufficient Teams"));
        assert!(formatted.contains("need 5 teams"));
    }
}
