use std::sync::Arc;

use serde::Deserialize;

use super::domain::{FieldErrors, RoleProfile, ValidationResult};
use super::leads::{ContactError, ContactRecord, LeadError, LeadSink, LeadSubmission};
use super::report::{RenderedReport, ReportError, ReportRenderer};
use super::tables::ReferenceOptions;
use super::{AssessmentError, EstimationError, SalaryEstimate, SalaryEstimator};

/// Calculator submission, optionally carrying the visitor's contact details.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EstimateRequest {
    pub profile: RoleProfile,
    #[serde(default)]
    pub contact: Option<ContactRecord>,
}

/// Report download request; a contact is mandatory for downloads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportRequest {
    pub profile: RoleProfile,
    pub contact: ContactRecord,
}

/// Service composing the estimator, lead sink, and report renderer.
pub struct SalaryEstimationService<L, R> {
    estimator: Arc<SalaryEstimator>,
    leads: Arc<L>,
    renderer: Arc<R>,
}

impl<L, R> SalaryEstimationService<L, R>
where
    L: LeadSink + 'static,
    R: ReportRenderer + 'static,
{
    pub fn new(estimator: SalaryEstimator, leads: Arc<L>, renderer: Arc<R>) -> Self {
        Self {
            estimator: Arc::new(estimator),
            leads,
            renderer,
        }
    }

    pub fn estimator(&self) -> &SalaryEstimator {
        &self.estimator
    }

    pub fn validate(&self, profile: &RoleProfile) -> ValidationResult {
        self.estimator.validate(profile)
    }

    /// Validate and estimate. Never touches the lead sink.
    pub fn estimate(&self, profile: &RoleProfile) -> Result<SalaryEstimate, ServiceError> {
        Ok(self.estimator.assess(profile)?)
    }

    /// Validate the contact, estimate, and render the downloadable report.
    pub fn report(
        &self,
        profile: &RoleProfile,
        contact: &ContactRecord,
    ) -> Result<(SalaryEstimate, RenderedReport), ServiceError> {
        contact.validate()?;
        let estimate = self.estimator.assess(profile)?;
        let report = self.renderer.render(&estimate, contact)?;
        Ok((estimate, report))
    }

    /// Forward one lead to the sink. Callers treat failures as non-fatal.
    pub fn record_lead(
        &self,
        contact: ContactRecord,
        estimate: Option<SalaryEstimate>,
    ) -> Result<(), LeadCaptureError> {
        contact.validate()?;
        self.leads.submit(LeadSubmission::new(contact, estimate))?;
        Ok(())
    }

    pub fn options(&self) -> ReferenceOptions {
        self.estimator.tables().options()
    }
}

/// Error raised by the salary service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid profile: {0}")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Estimation(#[from] EstimationError),
    #[error(transparent)]
    Contact(#[from] ContactError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl From<AssessmentError> for ServiceError {
    fn from(value: AssessmentError) -> Self {
        match value {
            AssessmentError::Invalid(errors) => Self::Invalid(errors),
            AssessmentError::Estimation(err) => Self::Estimation(err),
        }
    }
}

/// Why a lead did not reach the sink.
#[derive(Debug, thiserror::Error)]
pub enum LeadCaptureError {
    #[error(transparent)]
    Contact(#[from] ContactError),
    #[error(transparent)]
    Sink(#[from] LeadError),
}
