/*!
 * 基于角色的访问控制中间件
 *
 * 必须在 RequireJWT 之后执行：
 *
 * ```rust,ignore
 * web::scope("/grades")
 *     .wrap(RequireRole::new_any(UserRole::teacher_roles()))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::{
    middlewares::RequireJWT,
    models::{ErrorCode, users::entities::UserRole},
};

use super::create_error_response;

/// 当前用户角色属于 `allowed_roles` 之一即放行
#[derive(Clone)]
pub struct RequireRole {
    allowed_roles: Vec<UserRole>,
}

impl RequireRole {
    pub fn new(role: &UserRole) -> Self {
        Self {
            allowed_roles: vec![role.clone()],
        }
    }

    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed_roles: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed_roles: self.allowed_roles.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed_roles: Vec<UserRole>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allowed_roles = self.allowed_roles.clone();

        Box::pin(async move {
            let user_id = RequireJWT::extract_user_id(req.request());
            let user_role = RequireJWT::extract_user_role(req.request());

            match (user_id, user_role) {
                (Some(_), Some(role)) if allowed_roles.contains(&role) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                (Some(user_id), role) => {
                    info!(
                        "Access denied for user {} (role: {:?}). Required roles: {:?}",
                        user_id, role, allowed_roles
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Access denied.",
                        )
                        .map_into_right_body(),
                    ))
                }
                (None, _) => {
                    info!("Role check failed: no authenticated user, RequireJWT must run first");
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{User, UserStatus};
    use actix_web::test::{TestRequest, call_service, init_service};
    use actix_web::{App, HttpMessage, HttpResponse, web};

    fn user_with(role: UserRole) -> User {
        User {
            id: 7,
            username: "u7".to_string(),
            display_name: None,
            role,
            status: UserStatus::Active,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[actix_web::test]
    async fn test_allows_listed_roles_only() {
        for (role, expected) in [
            (UserRole::Teacher, StatusCode::OK),
            (UserRole::Admin, StatusCode::OK),
            (UserRole::Student, StatusCode::FORBIDDEN),
        ] {
            let user = user_with(role);
            let app = init_service(
                App::new()
                    .service(
                        web::scope("/t")
                            .wrap(RequireRole::new_any(UserRole::teacher_roles()))
                            .route("", web::get().to(|| async { HttpResponse::Ok().finish() })),
                    )
                    // 模拟 RequireJWT 写入的用户
                    .wrap_fn(move |req, srv| {
                        req.extensions_mut().insert(user.clone());
                        srv.call(req)
                    }),
            )
            .await;

            let resp = call_service(&app, TestRequest::get().uri("/t").to_request()).await;
            assert_eq!(resp.status(), expected);
        }
    }

    #[actix_web::test]
    async fn test_requires_authenticated_user() {
        let app = init_service(
            App::new().service(
                web::scope("/t")
                    .wrap(RequireRole::new(&UserRole::Admin))
                    .route("", web::get().to(|| async { HttpResponse::Ok().finish() })),
            ),
        )
        .await;

        let resp = call_service(&app, TestRequest::get().uri("/t").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
