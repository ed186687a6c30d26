use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::missing_user_response;
use crate::middlewares::{self, RequireJWT};
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::evaluations::requests::DistributeEvaluationsRequest;
use crate::models::investments::requests::InvestRequest;
use crate::models::submissions::requests::SubmitRequest;
use crate::models::teams::requests::CreateTeamRequest;
use crate::models::users::entities::UserRole;
use crate::services::{
    AssignmentService, EvaluationService, GradeService, InvestmentService, SubmissionService,
};
use crate::utils::SafeIDI64;

static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);
static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);
static INVESTMENT_SERVICE: Lazy<InvestmentService> = Lazy::new(InvestmentService::new_lazy);
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

// 创建作业
pub async fn create_assignment(
    req: HttpRequest,
    body: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(missing_user_response());
    };

    ASSIGNMENT_SERVICE
        .create_assignment(&req, user_id, body.into_inner())
        .await
}

pub async fn get_assignment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment(&req, path.0).await
}

pub async fn create_team(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<CreateTeamRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_team(&req, path.0, body.into_inner())
        .await
}

pub async fn list_teams(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_teams(&req, path.0).await
}

// 提交或保存草稿
pub async fn submit(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<SubmitRequest>,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(missing_user_response());
    };

    SUBMISSION_SERVICE
        .submit(&req, path.0, user_id, body.into_inner())
        .await
}

// 分发评审任务，请求体可省略
pub async fn distribute_evaluations(
    req: HttpRequest,
    path: SafeIDI64,
    body: Option<web::Json<DistributeEvaluationsRequest>>,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(missing_user_response());
    };

    let body = body.map(|b| b.into_inner()).unwrap_or_default();
    EVALUATION_SERVICE
        .distribute_evaluations(&req, path.0, user_id, body)
        .await
}

pub async fn list_my_evaluations(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(missing_user_response());
    };

    EVALUATION_SERVICE
        .list_my_evaluations(&req, path.0, user_id)
        .await
}

// 投资并完成对应评审
pub async fn invest(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<InvestRequest>,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(missing_user_response());
    };

    INVESTMENT_SERVICE
        .invest(&req, path.0, user_id, body.into_inner())
        .await
}

pub async fn calculate_grades(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.calculate_grades(&req, path.0).await
}

pub async fn list_grades(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_grades(&req, path.0).await
}

pub async fn publish_grades(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.publish_grades(&req, path.0).await
}

fn teacher_only() -> middlewares::RequireRole {
    middlewares::RequireRole::new_any(UserRole::teacher_roles())
}

fn limited() -> middlewares::RateLimit {
    middlewares::RateLimit::new("assignments")
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .route(
                "",
                web::post()
                    .to(create_assignment)
                    .wrap(teacher_only())
                    .wrap(limited()),
            )
            .route("/{id}", web::get().to(get_assignment))
            .service(
                web::resource("/{id}/teams")
                    .route(web::get().to(list_teams))
                    .route(
                        web::post()
                            .to(create_team)
                            .wrap(teacher_only())
                            .wrap(limited()),
                    ),
            )
            // 团队成员提交，归属在业务层校验
            .route(
                "/{id}/submissions",
                web::post().to(submit).wrap(limited()),
            )
            .route(
                "/{id}/evaluations/distribute",
                web::post()
                    .to(distribute_evaluations)
                    .wrap(teacher_only())
                    .wrap(limited()),
            )
            .route("/{id}/evaluations/my", web::get().to(list_my_evaluations))
            .route(
                "/{id}/investments",
                web::post().to(invest).wrap(limited()),
            )
            .route(
                "/{id}/grades/calculate",
                web::post()
                    .to(calculate_grades)
                    .wrap(teacher_only())
                    .wrap(limited()),
            )
            .route(
                "/{id}/grades",
                web::get().to(list_grades).wrap(teacher_only()),
            )
            .route(
                "/{id}/grades/publish",
                web::post()
                    .to(publish_grades)
                    .wrap(teacher_only())
                    .wrap(limited()),
            ),
    );
}
