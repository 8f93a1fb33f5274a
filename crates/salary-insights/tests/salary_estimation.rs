//! End-to-end scenarios for the salary calculator through the public service facade,
//! using an alternative table version loaded from disk alongside the embedded one.

use std::fs;
use std::sync::{Arc, Mutex};

use salary_insights::estimation::{
    ContactRecord, LeadError, LeadSink, LeadSubmission, PlainTextReportRenderer, ProfileField,
    RoleProfile, SalaryEstimationService, SalaryEstimator, SalaryTables, ServiceError,
};

#[derive(Default)]
struct RecordingLeads {
    leads: Mutex<Vec<LeadSubmission>>,
}

impl LeadSink for RecordingLeads {
    fn submit(&self, lead: LeadSubmission) -> Result<(), LeadError> {
        self.leads.lock().expect("lead mutex").push(lead);
        Ok(())
    }
}

fn service_for(
    tables: SalaryTables,
) -> (
    SalaryEstimationService<RecordingLeads, PlainTextReportRenderer>,
    Arc<RecordingLeads>,
) {
    let leads = Arc::new(RecordingLeads::default());
    let service = SalaryEstimationService::new(
        SalaryEstimator::new(tables),
        leads.clone(),
        Arc::new(PlainTextReportRenderer::new()),
    );
    (service, leads)
}

fn profile() -> RoleProfile {
    RoleProfile::new("HR Manager", "1-3", "Other", "other")
}

#[test]
fn table_versions_coexist_without_interference() {
    let current = SalaryTables::embedded().expect("embedded tables");

    let mut next_year = current.clone();
    next_year.version = "2026.1".to_string();
    if let Some(band) = next_year.positions.get_mut("HR Manager") {
        band.base = 1_000_000;
    }
    let path = std::env::temp_dir().join(format!(
        "salary-tables-{}-{}.json",
        std::process::id(),
        next_year.version
    ));
    fs::write(
        &path,
        serde_json::to_string_pretty(&next_year).expect("serialize tables"),
    )
    .expect("write tables");
    let loaded = SalaryTables::from_path(&path).expect("tables load from disk");
    fs::remove_file(&path).ok();

    let (current_service, _) = service_for(current);
    let (next_service, _) = service_for(loaded);

    let before = current_service.estimate(&profile()).expect("estimate");
    let after = next_service.estimate(&profile()).expect("estimate");

    assert_eq!(before.point_estimate, 675_000);
    assert_eq!(after.point_estimate, 750_000);
    assert_eq!(after.tables_version, "2026.1");
    assert_ne!(before.tables_version, after.tables_version);
}

#[test]
fn invalid_submission_then_corrected_resubmission() {
    let (service, leads) = service_for(SalaryTables::embedded().expect("embedded tables"));
    let mut draft = RoleProfile::new("", "5-8", "Atlantis", "");

    let errors = match service.estimate(&draft) {
        Err(ServiceError::Invalid(errors)) => errors,
        other => panic!("expected validation errors, got {other:?}"),
    };
    assert_eq!(errors.len(), 3);
    assert_eq!(errors.get(ProfileField::Location), Some("unknown location 'Atlantis'"));

    draft.position = "HR Business Partner".to_string();
    draft.location = "Pune".to_string();
    draft.industry = "consulting".to_string();
    let estimate = service.estimate(&draft).expect("corrected profile estimates");

    // 1_200_000 x 1.4 x 1.2 x 1.25 = 2_520_000
    assert_eq!(estimate.point_estimate, 2_520_000);
    assert_eq!(estimate.min_estimate, 2_142_000);
    assert_eq!(estimate.max_estimate, 2_898_000);

    let contact = ContactRecord {
        name: "Rahul Mehta".to_string(),
        email: "rahul@northwind.in".to_string(),
        phone: None,
        company: Some("Northwind".to_string()),
    };
    service
        .record_lead(contact, Some(estimate))
        .expect("lead recorded");
    assert_eq!(leads.leads.lock().expect("lead mutex").len(), 1);
}
