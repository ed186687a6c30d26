use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::missing_user_response;
use crate::middlewares::{self, RequireJWT};
use crate::services::InterestService;

static INTEREST_SERVICE: Lazy<InterestService> = Lazy::new(InterestService::new_lazy);

pub async fn get_my_bonus(req: HttpRequest) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(missing_user_response());
    };

    INTEREST_SERVICE.get_my_bonus(&req, user_id).await
}

pub fn configure_interest_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/interest")
            .wrap(middlewares::RequireJWT)
            .route("/me", web::get().to(get_my_bonus)),
    );
}
