use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::TycoonError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// 将业务错误转换为带状态码的 JSON 响应
pub fn error_response(err: &TycoonError) -> HttpResponse {
    HttpResponse::build(err.http_status())
        .json(ApiResponse::error_empty(ErrorCode::from(err), err.message()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_response_status_follows_error() {
        let resp = error_response(&TycoonError::already_distributed("已分发"));
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = error_response(&TycoonError::not_found("作业不存在"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_envelope_serialization() {
        let body = ApiResponse::error_empty(ErrorCode::InsufficientTeams, "团队数量不足");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 4001);
        assert_eq!(json["message"], "团队数量不足");
        assert!(json.get("data").is_none());
    }
}
