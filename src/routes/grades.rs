use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::missing_user_response;
use crate::middlewares::{self, RequireJWT};
use crate::models::grades::requests::OverrideGradeRequest;
use crate::models::users::entities::UserRole;
use crate::services::GradeService;
use crate::utils::SafeIDI64;

static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

// 手动覆盖成绩，之后的重新计算不会改写
pub async fn override_grade(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<OverrideGradeRequest>,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(missing_user_response());
    };

    GRADE_SERVICE
        .override_grade(&req, path.0, user_id, body.into_inner())
        .await
}

pub fn configure_grade_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequireJWT)
            .route(
                "/{id}/override",
                web::put()
                    .to(override_grade)
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .wrap(middlewares::RateLimit::new("grades")),
            ),
    );
}
