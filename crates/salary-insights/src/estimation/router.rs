use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::warn;

use super::domain::{RoleProfile, ValidationResult};
use super::leads::{ContactRecord, LeadSink};
use super::report::ReportRenderer;
use super::service::{EstimateRequest, ReportRequest, SalaryEstimationService, ServiceError};
use super::SalaryEstimate;

/// Router builder exposing the calculator endpoints.
pub fn salary_router<L, R>(service: Arc<SalaryEstimationService<L, R>>) -> Router
where
    L: LeadSink + 'static,
    R: ReportRenderer + 'static,
{
    Router::new()
        .route("/api/v1/salary/options", get(options_handler::<L, R>))
        .route("/api/v1/salary/validate", post(validate_handler::<L, R>))
        .route("/api/v1/salary/estimate", post(estimate_handler::<L, R>))
        .route("/api/v1/salary/report", post(report_handler::<L, R>))
        .with_state(service)
}

pub(crate) async fn options_handler<L, R>(
    State(service): State<Arc<SalaryEstimationService<L, R>>>,
) -> Response
where
    L: LeadSink + 'static,
    R: ReportRenderer + 'static,
{
    (StatusCode::OK, axum::Json(service.options())).into_response()
}

pub(crate) async fn validate_handler<L, R>(
    State(service): State<Arc<SalaryEstimationService<L, R>>>,
    axum::Json(profile): axum::Json<RoleProfile>,
) -> Response
where
    L: LeadSink + 'static,
    R: ReportRenderer + 'static,
{
    let payload = match service.validate(&profile) {
        ValidationResult::Valid => json!({ "valid": true, "errors": {} }),
        ValidationResult::Invalid(errors) => json!({ "valid": false, "errors": errors }),
    };
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn estimate_handler<L, R>(
    State(service): State<Arc<SalaryEstimationService<L, R>>>,
    axum::Json(request): axum::Json<EstimateRequest>,
) -> Response
where
    L: LeadSink + 'static,
    R: ReportRenderer + 'static,
{
    let EstimateRequest { profile, contact } = request;
    match service.estimate(&profile) {
        Ok(estimate) => {
            if let Some(contact) = contact {
                dispatch_lead(service.clone(), contact, Some(estimate.clone()));
            }
            (StatusCode::OK, axum::Json(estimate)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<L, R>(
    State(service): State<Arc<SalaryEstimationService<L, R>>>,
    axum::Json(request): axum::Json<ReportRequest>,
) -> Response
where
    L: LeadSink + 'static,
    R: ReportRenderer + 'static,
{
    let ReportRequest { profile, contact } = request;
    match service.report(&profile, &contact) {
        Ok((estimate, report)) => {
            dispatch_lead(service.clone(), contact, Some(estimate));

            let content_type = HeaderValue::from_str(&report.content_type)
                .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
            let disposition =
                HeaderValue::from_str(&format!("attachment; filename=\"{}\"", report.file_name))
                    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                report.bytes,
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

/// Hands the lead to the sink off the request path; the response never waits on it.
fn dispatch_lead<L, R>(
    service: Arc<SalaryEstimationService<L, R>>,
    contact: ContactRecord,
    estimate: Option<SalaryEstimate>,
) where
    L: LeadSink + 'static,
    R: ReportRenderer + 'static,
{
    tokio::task::spawn_blocking(move || {
        if let Err(error) = service.record_lead(contact, estimate) {
            warn!(%error, "lead capture failed; estimate already returned");
        }
    });
}

fn error_response(error: ServiceError) -> Response {
    match error {
        ServiceError::Invalid(fields) => {
            let payload = json!({
                "error": "invalid profile",
                "fields": fields,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        ServiceError::Contact(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
