//! Salary estimation: reference tables, profile validation, and the pure estimate
//! calculation, plus the lead-capture and report seams the calculator hands results to.

pub mod domain;
pub mod leads;
pub mod report;
pub mod router;
mod rules;
pub mod service;
pub mod tables;
mod validation;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use domain::{
    CompanySize, EducationLevel, ExperienceBand, FieldErrors, ProfileField, RoleProfile,
    ValidationResult,
};
pub use leads::{ContactError, ContactRecord, CsvLeadLog, LeadError, LeadSink, LeadSubmission};
pub use report::{PlainTextReportRenderer, RenderedReport, ReportError, ReportRenderer};
pub use router::salary_router;
pub use rules::{RANGE_CEILING, RANGE_FLOOR};
pub use service::{
    EstimateRequest, LeadCaptureError, ReportRequest, SalaryEstimationService, ServiceError,
};
pub use tables::{
    MarketTrend, OptionEntry, PositionBand, ReferenceOptions, SalaryTables, TableError,
    TrendDirection,
};

/// Stateless estimator bound to one version of the reference tables.
#[derive(Debug, Clone)]
pub struct SalaryEstimator {
    tables: Arc<SalaryTables>,
}

impl SalaryEstimator {
    pub fn new(tables: SalaryTables) -> Self {
        Self::with_shared(Arc::new(tables))
    }

    pub fn with_shared(tables: Arc<SalaryTables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &SalaryTables {
        &self.tables
    }

    pub fn validate(&self, profile: &RoleProfile) -> ValidationResult {
        validation::validate_profile(profile, &self.tables)
    }

    /// Callers are expected to run [`SalaryEstimator::validate`] first; an unknown
    /// position is the only failure this reports.
    pub fn estimate(&self, profile: &RoleProfile) -> Result<SalaryEstimate, EstimationError> {
        let estimate = rules::estimate_profile(profile, &self.tables)?;
        debug!(
            position = %estimate.position,
            location = %estimate.location,
            point_estimate = estimate.point_estimate,
            tables_version = %estimate.tables_version,
            "salary estimate computed"
        );
        Ok(estimate)
    }

    /// Validate then estimate.
    pub fn assess(&self, profile: &RoleProfile) -> Result<SalaryEstimate, AssessmentError> {
        self.validate(profile)
            .into_result()
            .map_err(AssessmentError::Invalid)?;
        Ok(self.estimate(profile)?)
    }
}

/// Resolved inputs behind an estimate, kept for display and audit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimateBreakdown {
    pub base: u64,
    pub experience: f64,
    pub location: f64,
    pub education: f64,
    pub company_size: f64,
    pub industry: f64,
}

impl EstimateBreakdown {
    /// Unrounded base after all multipliers, applied in a fixed order.
    pub fn adjusted_base(&self) -> f64 {
        self.base as f64
            * self.experience
            * self.location
            * self.education
            * self.company_size
            * self.industry
    }
}

/// Estimate for one profile. Amounts are whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryEstimate {
    pub position: String,
    pub experience: String,
    pub location: String,
    pub industry: String,
    pub education: String,
    pub company_size: String,
    pub point_estimate: u64,
    pub min_estimate: u64,
    pub max_estimate: u64,
    pub skills_bonus: u64,
    pub matched_skills: BTreeMap<String, u64>,
    pub breakdown: EstimateBreakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_trend: Option<MarketTrend>,
    pub currency: String,
    pub tables_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EstimationError {
    #[error("unknown position '{0}'")]
    UnknownPosition(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssessmentError {
    #[error("invalid profile: {0}")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Estimation(#[from] EstimationError),
}
