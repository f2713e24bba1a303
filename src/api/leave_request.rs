use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::leave::{LeaveForm, LeaveService, Reviewer};
use crate::model::leave_request::Decision;
use crate::model::role::Submitter;

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeeParams {
    /// Employee submitting the leave request
    #[param(example = 1000)]
    pub user_id: u64,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ManagerParams {
    /// Manager submitting the leave request
    #[param(example = 7)]
    pub manager_id: u64,
}

/* =========================
Apply for leave (Employee)
========================= */
/// Swagger doc for apply_leave endpoint
#[utoipa::path(
    post,
    path = "/leave/apply",
    params(EmployeeParams),
    request_body(
        content = LeaveForm,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted, reviewed by the manager", body = crate::model::leave_request::LeaveRequest),
        (status = 400, description = "One or more fields are invalid", body = crate::error::ErrorBody),
        (status = 500, description = "Leave request could not be stored", body = crate::error::ErrorBody)
    ),
    tag = "Leave"
)]
pub async fn apply_leave(
    service: web::Data<LeaveService>,
    query: web::Query<EmployeeParams>,
    payload: web::Json<LeaveForm>,
) -> actix_web::Result<impl Responder> {
    let created = service
        .submit(Submitter::Employee, query.user_id, &payload)
        .await?;

    Ok(HttpResponse::Created().json(created))
}

/* =========================
Apply for leave (Manager)
========================= */
/// Swagger doc for apply_manager_leave endpoint
#[utoipa::path(
    post,
    path = "/leave/manager/apply",
    params(ManagerParams),
    request_body(
        content = LeaveForm,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted, reviewed by HR", body = crate::model::leave_request::LeaveRequest),
        (status = 400, description = "One or more fields are invalid", body = crate::error::ErrorBody),
        (status = 500, description = "Leave request could not be stored", body = crate::error::ErrorBody)
    ),
    tag = "Leave"
)]
pub async fn apply_manager_leave(
    service: web::Data<LeaveService>,
    query: web::Query<ManagerParams>,
    payload: web::Json<LeaveForm>,
) -> actix_web::Result<impl Responder> {
    let created = service
        .submit(Submitter::Manager, query.manager_id, &payload)
        .await?;

    Ok(HttpResponse::Created().json(created))
}

/// for listing the leave applications of one user
#[utoipa::path(
    get,
    path = "/leave/user/{user_id}",
    params(
        ("user_id" = u64, Path, description = "Requester whose leave requests are listed")
    ),
    responses(
        (status = 200, description = "Every leave request of the user, any status", body = [crate::model::leave_request::LeaveRequest]),
        (status = 500, description = "Leave requests could not be loaded", body = crate::error::ErrorBody)
    ),
    tag = "Leave"
)]
pub async fn list_user_leaves(
    service: web::Data<LeaveService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let requests = service.list_by_requester(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(requests))
}

/// for getting a leave application details endpoint
#[utoipa::path(
    get,
    path = "/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = crate::model::leave_request::LeaveRequest),
        (status = 404, description = "Leave request not found", body = crate::error::ErrorBody)
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    service: web::Data<LeaveService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let request = service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(request))
}

/* =========================
Approve leave (reviewer)
========================= */
/// Swagger doc for approve_leave endpoint
#[utoipa::path(
    put,
    path = "/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve"),
        Reviewer
    ),
    responses(
        (status = 200, description = "Leave approved", body = crate::model::leave_request::LeaveRequest),
        (status = 403, description = "Caller is not the reviewing authority", body = crate::error::ErrorBody),
        (status = 404, description = "Leave request not found", body = crate::error::ErrorBody),
        (status = 409, description = "Leave request already decided", body = crate::error::ErrorBody)
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    service: web::Data<LeaveService>,
    path: web::Path<u64>,
    reviewer: web::Query<Reviewer>,
) -> actix_web::Result<impl Responder> {
    let decided = service
        .decide(path.into_inner(), Decision::Approve, reviewer.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(decided))
}

/* =========================
Deny leave (reviewer)
========================= */
/// Swagger doc for deny_leave endpoint
#[utoipa::path(
    put,
    path = "/leave/{leave_id}/deny",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to deny"),
        Reviewer
    ),
    responses(
        (status = 200, description = "Leave denied", body = crate::model::leave_request::LeaveRequest),
        (status = 403, description = "Caller is not the reviewing authority", body = crate::error::ErrorBody),
        (status = 404, description = "Leave request not found", body = crate::error::ErrorBody),
        (status = 409, description = "Leave request already decided", body = crate::error::ErrorBody)
    ),
    tag = "Leave"
)]
pub async fn deny_leave(
    service: web::Data<LeaveService>,
    path: web::Path<u64>,
    reviewer: web::Query<Reviewer>,
) -> actix_web::Result<impl Responder> {
    let decided = service
        .decide(path.into_inner(), Decision::Deny, reviewer.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(decided))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test, web::Data};
    use serde_json::{Value, json};

    use crate::config::Config;
    use crate::error::ErrorBody;
    use crate::leave::LeaveService;
    use crate::model::leave_request::{LeaveRequest, LeaveStatus};
    use crate::model::role::ReviewerRole;
    use crate::routes;
    use crate::store::MemoryStore;
    use crate::utils::sample_feed::SampleFeed;

    macro_rules! test_app {
        () => {{
            let config = Config::for_tests();
            let limiter = Arc::new(routes::build_limiter(config.rate_submit_per_min).unwrap());
            let service = LeaveService::new(Arc::new(MemoryStore::new()));
            let feed = SampleFeed::new(config.metrics_period, config.metrics_points);
            test::init_service(
                App::new()
                    .app_data(Data::new(service))
                    .app_data(Data::new(feed))
                    .configure(|cfg| routes::configure(cfg, &config, limiter)),
            )
            .await
        }};
    }

    fn medical() -> Value {
        json!({ "reason": "Medical", "startDate": "2024-05-01", "endDate": "2024-05-03" })
    }

    #[actix_web::test]
    async fn employee_submission_is_listed_for_the_requester() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/leave/apply?userId=1")
            .set_json(medical())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: LeaveRequest = test::read_body_json(resp).await;
        assert_eq!(created.status, LeaveStatus::Pending);
        assert_eq!(created.requester_id, 1);
        assert_eq!(created.reviewer_role, ReviewerRole::Manager);

        let req = test::TestRequest::get().uri("/leave/user/1").to_request();
        let listed: Vec<LeaveRequest> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed, vec![created]);
    }

    #[actix_web::test]
    async fn manager_submission_is_reviewed_by_hr() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/leave/manager/apply?managerId=7")
            .set_json(medical())
            .to_request();
        let created: LeaveRequest = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.requester_id, 7);
        assert_eq!(created.reviewer_role, ReviewerRole::Hr);
    }

    #[actix_web::test]
    async fn backwards_dates_are_rejected_on_end_date_and_nothing_is_created() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/leave/apply?userId=1")
            .set_json(json!({ "reason": "Medical", "startDate": "2024-05-03", "endDate": "2024-05-01" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(body.errors.len(), 1);
        assert_eq!(serde_json::to_value(body.errors[0].field).unwrap(), "endDate");

        let req = test::TestRequest::get().uri("/leave/user/1").to_request();
        let listed: Vec<LeaveRequest> = test::call_and_read_body_json(&app, req).await;
        assert!(listed.is_empty());
    }

    #[actix_web::test]
    async fn missing_fields_are_all_reported_at_once() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/leave/apply?userId=1")
            .set_json(json!({ "reason": "  " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["reason", "startDate", "endDate"]);
    }

    #[actix_web::test]
    async fn unknown_requester_gets_an_empty_list() {
        let app = test_app!();
        let req = test::TestRequest::get().uri("/leave/user/404").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let listed: Vec<LeaveRequest> = test::read_body_json(resp).await;
        assert!(listed.is_empty());
    }

    #[actix_web::test]
    async fn approve_then_deny_is_a_conflict() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/leave/apply?userId=1")
            .set_json(medical())
            .to_request();
        let created: LeaveRequest = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::put()
            .uri(&format!("/leave/{}/approve?reviewerRole=Manager", created.id))
            .to_request();
        let approved: LeaveRequest = test::call_and_read_body_json(&app, req).await;
        assert_eq!(approved.status, LeaveStatus::Approved);

        let req = test::TestRequest::put()
            .uri(&format!("/leave/{}/deny?reviewerRole=Manager", created.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::get()
            .uri(&format!("/leave/{}", created.id))
            .to_request();
        let current: LeaveRequest = test::call_and_read_body_json(&app, req).await;
        assert_eq!(current.status, LeaveStatus::Approved);
    }

    #[actix_web::test]
    async fn wrong_reviewer_role_is_forbidden() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/leave/apply?userId=1")
            .set_json(medical())
            .to_request();
        let created: LeaveRequest = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::put()
            .uri(&format!("/leave/{}/deny?reviewerRole=HR", created.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn unknown_leave_is_not_found() {
        let app = test_app!();
        let req = test::TestRequest::get().uri("/leave/99").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.code, "NOT_FOUND");
    }

    #[actix_web::test]
    async fn malformed_json_uses_the_error_shape() {
        let app = test_app!();
        let req = test::TestRequest::post()
            .uri("/leave/apply?userId=1")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.code, "BAD_REQUEST");
    }
}
