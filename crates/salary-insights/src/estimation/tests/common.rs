use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::estimation::leads::{ContactRecord, LeadError, LeadSink, LeadSubmission};
use crate::estimation::report::PlainTextReportRenderer;
use crate::estimation::{
    salary_router, RoleProfile, SalaryEstimationService, SalaryEstimator, SalaryTables,
};

pub(super) fn tables() -> SalaryTables {
    SalaryTables::embedded().expect("embedded tables parse")
}

pub(super) fn estimator() -> SalaryEstimator {
    SalaryEstimator::new(tables())
}

/// HR Manager in an unlisted city with every other dimension neutral.
pub(super) fn baseline_profile() -> RoleProfile {
    RoleProfile::new("HR Manager", "1-3", "Other", "other")
        .with_education("bachelor")
        .with_company_size("small")
}

pub(super) fn contact() -> ContactRecord {
    ContactRecord {
        name: "Anita Desai".to_string(),
        email: "anita@acme.co.in".to_string(),
        phone: Some("+91 22 5550 0100".to_string()),
        company: Some("Acme Textiles".to_string()),
    }
}

pub(super) fn report_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 3).expect("valid date")
}

pub(super) type TestService = SalaryEstimationService<MemoryLeads, PlainTextReportRenderer>;

pub(super) fn build_service() -> (TestService, Arc<MemoryLeads>) {
    let leads = Arc::new(MemoryLeads::default());
    let service = SalaryEstimationService::new(
        estimator(),
        leads.clone(),
        Arc::new(PlainTextReportRenderer::dated(report_date())),
    );
    (service, leads)
}

pub(super) fn router_with_service<L: LeadSink + 'static>(
    service: SalaryEstimationService<L, PlainTextReportRenderer>,
) -> axum::Router {
    salary_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryLeads {
    submissions: Arc<Mutex<Vec<LeadSubmission>>>,
}

impl MemoryLeads {
    pub(super) fn submissions(&self) -> Vec<LeadSubmission> {
        self.submissions.lock().expect("lead mutex poisoned").clone()
    }

    /// Leads are dispatched off the request path, so routing tests poll briefly.
    pub(super) fn wait_for(&self, count: usize) -> Vec<LeadSubmission> {
        for _ in 0..200 {
            let current = self.submissions();
            if current.len() >= count {
                return current;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        self.submissions()
    }
}

impl LeadSink for MemoryLeads {
    fn submit(&self, lead: LeadSubmission) -> Result<(), LeadError> {
        self.submissions
            .lock()
            .expect("lead mutex poisoned")
            .push(lead);
        Ok(())
    }
}

pub(super) struct OfflineLeads;

impl LeadSink for OfflineLeads {
    fn submit(&self, _lead: LeadSubmission) -> Result<(), LeadError> {
        Err(LeadError::Transport("crm offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
