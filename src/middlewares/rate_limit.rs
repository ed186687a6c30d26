/*!
 * 速率限制中间件
 *
 * 限流器通过 `web::Data<Arc<dyn RateLimiter>>` 注入，已认证请求按用户 ID 计数，
 * 否则按客户端 IP 计数，超过限制返回 429 Too Many Requests。
 *
 * ```rust,ignore
 * web::scope("/api/v1/assignments")
 *     .wrap(RateLimit::new("assignments"))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{error, warn};

use crate::models::{ApiResponse, ErrorCode};
use crate::rate_limiter::{RateDecision, RateLimiter};

#[derive(Clone)]
pub struct RateLimit {
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
}

impl RateLimit {
    pub fn new(prefix: &str) -> Self {
        Self {
            key_prefix: prefix.to_string(),
        }
    }
}

/// 从请求中提取客户端 IP
///
/// 服务部署在反向代理后面时，需要代理正确设置 X-Forwarded-For / X-Real-IP 头。
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    // 只取第一个 IP（最接近客户端的）
    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    use std::net::IpAddr;
    ip.parse::<IpAddr>().is_ok()
}

/// 已认证请求的用户 ID（需在 RequireJWT 之后执行）
fn extract_user_id(req: &ServiceRequest) -> Option<i64> {
    use crate::models::users::entities::User;
    req.extensions().get::<User>().map(|user| user.id)
}

fn rate_limit_key(prefix: &str, req: &ServiceRequest) -> String {
    let identifier = extract_user_id(req)
        .map(|id| format!("user:{id}"))
        .unwrap_or_else(|| format!("ip:{}", extract_client_ip(req)));

    if prefix.is_empty() {
        identifier
    } else {
        format!("{prefix}:{identifier}")
    }
}

fn create_rate_limit_response(retry_after_secs: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after_secs.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "请求过于频繁，请稍后再试",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            key_prefix: self.key_prefix.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    key_prefix: String,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let key_prefix = self.key_prefix.clone();

        Box::pin(async move {
            let limiter = match req.app_data::<web::Data<Arc<dyn RateLimiter>>>() {
                Some(limiter) => limiter.get_ref().clone(),
                None => {
                    // 未注入限流器时直接放行
                    error!("Rate limiter not found in app data");
                    return Ok(srv.call(req).await?.map_into_left_body());
                }
            };

            let key = rate_limit_key(&key_prefix, &req);

            match limiter.check(&key) {
                RateDecision::Allowed { remaining } => {
                    req.extensions_mut().insert(RateLimitInfo {
                        remaining,
                        limit: limiter.limit(),
                    });
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                RateDecision::Limited { retry_after } => {
                    warn!(key, limit = limiter.limit(), "Rate limit exceeded");
                    // 向上取整，至少 1 秒
                    let secs = retry_after.as_secs()
                        + u64::from(retry_after.subsec_nanos() > 0);
                    Ok(req.into_response(
                        create_rate_limit_response(secs.max(1)).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

/// 本次请求的限流信息
#[derive(Clone)]
pub struct RateLimitInfo {
    pub remaining: u32,
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limiter::SlidingWindowLimiter;
    use actix_web::App;
    use actix_web::test::{TestRequest, call_service, init_service};
    use std::time::Duration;

    #[test]
    fn test_valid_ip() {
        assert!(is_valid_ip("10.0.0.1"));
        assert!(is_valid_ip("::1"));
        assert!(!is_valid_ip("not-an-ip"));
    }

    #[actix_web::test]
    async fn test_rejects_after_limit_with_retry_after() {
        let limiter: Arc<dyn RateLimiter> =
            Arc::new(SlidingWindowLimiter::new(2, Duration::from_secs(60)));

        let app = init_service(
            App::new().app_data(web::Data::new(limiter.clone())).service(
                web::scope("/api")
                    .wrap(RateLimit::new("api"))
                    .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
            ),
        )
        .await;

        for _ in 0..2 {
            let req = TestRequest::get()
                .uri("/api/ping")
                .insert_header(("X-Forwarded-For", "192.168.1.20"))
                .to_request();
            let resp = call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let req = TestRequest::get()
            .uri("/api/ping")
            .insert_header(("X-Forwarded-For", "192.168.1.20"))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after: u64 = resp
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap();
        assert!((1..=60).contains(&retry_after));

        // 重置后恢复
        limiter.reset();
        let req = TestRequest::get()
            .uri("/api/ping")
            .insert_header(("X-Forwarded-For", "192.168.1.20"))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
