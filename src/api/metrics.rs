use actix_web::{HttpResponse, Responder, web};

use crate::utils::sample_feed::{SampleFeed, SampleFrame};

/// Latest frame of the HR dashboard chart
#[utoipa::path(
    get,
    path = "/hr/metrics",
    responses(
        (status = 200, description = "Most recent sample frame", body = SampleFrame),
        (status = 204, description = "Feed stopped or no frame produced yet")
    ),
    tag = "HR"
)]
pub async fn hr_metrics(feed: web::Data<SampleFeed>) -> impl Responder {
    match feed.latest().await {
        Some(frame) => HttpResponse::Ok().json(frame),
        None => HttpResponse::NoContent().finish(),
    }
}
