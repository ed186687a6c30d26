use actix_web::HttpResponse;

use crate::models::{ApiResponse, ErrorCode};

pub mod assignments;

pub mod grades;

pub mod interest;

pub mod users;

pub use assignments::configure_assignment_routes;
pub use grades::configure_grade_routes;
pub use interest::configure_interest_routes;
pub use users::configure_user_routes;

// RequireJWT 之后仍取不到用户时的响应
pub(crate) fn missing_user_response() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "无法获取用户信息",
    ))
}
