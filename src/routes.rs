use std::sync::Arc;

use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, error, middleware::Condition, web};
use anyhow::anyhow;

use crate::{
    api::{leave_request, metrics},
    config::Config,
    error::ErrorBody,
};

pub type SubmitLimiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-peer limiter for the submission endpoints.
pub fn build_limiter(requests_per_min: u32) -> anyhow::Result<SubmitLimiter> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit of {requests_per_min} requests per minute"))?;
    Ok(Governor::new(&cfg))
}

fn bad_request(message: String) -> actix_web::Error {
    error::InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ErrorBody::new(message, "BAD_REQUEST")),
    )
    .into()
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiter: Arc<SubmitLimiter>) {
    let limited = config.rate_submit_per_min > 0;

    // Extractor failures use the same body as domain errors
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| bad_request(err.to_string())))
        .app_data(web::QueryConfig::default().error_handler(|err, _| bad_request(err.to_string())))
        .app_data(web::PathConfig::default().error_handler(|err, _| bad_request(err.to_string())));

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/leave")
                    // /leave/apply
                    .service(
                        web::resource("/apply")
                            .wrap(Condition::new(limited, limiter.clone()))
                            .route(web::post().to(leave_request::apply_leave)),
                    )
                    // /leave/manager/apply
                    .service(
                        web::resource("/manager/apply")
                            .wrap(Condition::new(limited, limiter))
                            .route(web::post().to(leave_request::apply_manager_leave)),
                    )
                    // /leave/user/{user_id}
                    .service(
                        web::resource("/user/{user_id}")
                            .route(web::get().to(leave_request::list_user_leaves)),
                    )
                    // /leave/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave_request::get_leave)))
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/deny
                    .service(
                        web::resource("/{id}/deny").route(web::put().to(leave_request::deny_leave)),
                    ),
            )
            .service(
                web::scope("/hr")
                    // /hr/metrics
                    .service(web::resource("/metrics").route(web::get().to(metrics::hr_metrics))),
            ),
    );
}
