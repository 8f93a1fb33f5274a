use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::estimation::report::PlainTextReportRenderer;
use crate::estimation::SalaryEstimationService;

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn baseline_json() -> Value {
    json!({
        "position": "HR Manager",
        "experience": "1-3",
        "location": "Other",
        "industry": "other",
        "education": "bachelor",
        "company_size": "small"
    })
}

#[tokio::test]
async fn estimate_route_returns_estimate() {
    let (service, leads) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/salary/estimate",
            json!({ "profile": baseline_json() }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["point_estimate"], 675_000);
    assert_eq!(body["min_estimate"], 573_750);
    assert_eq!(body["max_estimate"], 776_250);
    assert_eq!(body["breakdown"]["location"], 0.75);
    assert_eq!(body["market_trend"]["direction"], "up");
    assert!(leads.submissions().is_empty());
}

#[tokio::test]
async fn estimate_route_captures_lead_when_contact_present() {
    let (service, leads) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/salary/estimate",
            json!({
                "profile": baseline_json(),
                "contact": { "name": "Anita Desai", "email": "anita@acme.co.in" }
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let submissions = leads.wait_for(1);
    assert_eq!(submissions.len(), 1);
    let estimate = submissions[0].estimate.as_ref().expect("estimate attached");
    assert_eq!(estimate.point_estimate, 675_000);
}

#[tokio::test]
async fn estimate_route_succeeds_when_crm_is_down() {
    let service = SalaryEstimationService::new(
        estimator(),
        Arc::new(OfflineLeads),
        Arc::new(PlainTextReportRenderer::dated(report_date())),
    );
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/salary/estimate",
            json!({
                "profile": baseline_json(),
                "contact": { "name": "Anita Desai", "email": "anita@acme.co.in" }
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["point_estimate"], 675_000);
}

#[tokio::test]
async fn estimate_route_returns_unprocessable_with_all_fields() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/salary/estimate",
            json!({ "profile": { "experience": "3-5" } }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    let fields = body["fields"].as_object().expect("field map");
    assert_eq!(fields.len(), 3);
    assert_eq!(fields["position"], "position is required");
}

#[tokio::test]
async fn validate_route_reports_field_errors() {
    let (service, _) = build_service();
    let router = router_with_service(service);
    let mut profile = baseline_json();
    profile["position"] = json!("");

    let response = router
        .oneshot(post_json("/api/v1/salary/validate", profile))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["valid"], false);
    let errors = body["errors"].as_object().expect("error map");
    assert_eq!(errors.len(), 1);
    assert!(errors.contains_key("position"));
}

#[tokio::test]
async fn validate_route_accepts_valid_profile() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json("/api/v1/salary/validate", baseline_json()))
        .await
        .expect("router responds");

    let body = read_json_body(response).await;
    assert_eq!(body["valid"], true);
}

#[tokio::test]
async fn report_route_returns_attachment_and_records_lead() {
    let (service, leads) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/salary/report",
            json!({
                "profile": baseline_json(),
                "contact": { "name": "Anita Desai", "email": "anita@acme.co.in", "company": "Acme Textiles" }
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"salary-report-hr-manager.txt\""
    );
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let text = String::from_utf8(bytes.to_vec()).expect("utf8");
    assert!(text.contains("INR 6,75,000"));

    assert_eq!(leads.wait_for(1).len(), 1);
}

#[tokio::test]
async fn report_route_rejects_bad_contact() {
    let (service, leads) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/salary/report",
            json!({
                "profile": baseline_json(),
                "contact": { "name": "Anita Desai", "email": "anita" }
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(leads.submissions().is_empty());
}

#[tokio::test]
async fn options_route_lists_choices() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/salary/options")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["experience"][0]["value"], "0-1");
    assert!(body["positions"]
        .as_array()
        .expect("positions array")
        .iter()
        .any(|value| value == "HR Manager"));
}
