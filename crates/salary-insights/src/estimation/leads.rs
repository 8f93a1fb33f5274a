use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SalaryEstimate;

/// Contact details captured alongside a calculator submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

impl ContactRecord {
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::MissingName);
        }

        let email = self.email.trim();
        let well_formed = email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);
        if !well_formed {
            return Err(ContactError::InvalidEmail(email.to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactError {
    #[error("contact name is required")]
    MissingName,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

/// Payload handed to the CRM/storage collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub contact: ContactRecord,
    pub estimate: Option<SalaryEstimate>,
    pub submitted_at: DateTime<Utc>,
}

impl LeadSubmission {
    pub fn new(contact: ContactRecord, estimate: Option<SalaryEstimate>) -> Self {
        Self {
            contact,
            estimate,
            submitted_at: Utc::now(),
        }
    }
}

/// Outbound lead hook (CRM, form storage, local ledger).
pub trait LeadSink: Send + Sync {
    fn submit(&self, lead: LeadSubmission) -> Result<(), LeadError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    #[error("lead transport unavailable: {0}")]
    Transport(String),
    #[error("lead ledger write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("lead ledger io failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct LeadRow<'a> {
    submitted_at: String,
    name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    company: Option<&'a str>,
    position: Option<&'a str>,
    location: Option<&'a str>,
    point_estimate: Option<u64>,
    min_estimate: Option<u64>,
    max_estimate: Option<u64>,
    tables_version: Option<&'a str>,
}

impl<'a> From<&'a LeadSubmission> for LeadRow<'a> {
    fn from(lead: &'a LeadSubmission) -> Self {
        let estimate = lead.estimate.as_ref();
        Self {
            submitted_at: lead.submitted_at.to_rfc3339(),
            name: lead.contact.name.trim(),
            email: lead.contact.email.trim(),
            phone: lead.contact.phone.as_deref(),
            company: lead.contact.company.as_deref(),
            position: estimate.map(|estimate| estimate.position.as_str()),
            location: estimate.map(|estimate| estimate.location.as_str()),
            point_estimate: estimate.map(|estimate| estimate.point_estimate),
            min_estimate: estimate.map(|estimate| estimate.min_estimate),
            max_estimate: estimate.map(|estimate| estimate.max_estimate),
            tables_version: estimate.map(|estimate| estimate.tables_version.as_str()),
        }
    }
}

/// Append-only CSV ledger of captured leads.
pub struct CsvLeadLog<W: Write> {
    writer: Mutex<csv::Writer<W>>,
}

impl CsvLeadLog<File> {
    /// Opens (or creates) a ledger file, writing the header only for a new file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LeadError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let is_new = file.metadata()?.len() == 0;
        Ok(Self::from_writer(file, is_new))
    }
}

impl<W: Write> CsvLeadLog<W> {
    pub fn from_writer(writer: W, write_header: bool) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(writer);
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, LeadError> {
        let writer = self.writer.into_inner().map_err(|_| poisoned())?;
        writer
            .into_inner()
            .map_err(|err| LeadError::Io(err.into_error()))
    }
}

impl<W: Write + Send> LeadSink for CsvLeadLog<W> {
    fn submit(&self, lead: LeadSubmission) -> Result<(), LeadError> {
        let mut writer = self.writer.lock().map_err(|_| poisoned())?;
        writer.serialize(LeadRow::from(&lead))?;
        writer.flush()?;
        Ok(())
    }
}

fn poisoned() -> LeadError {
    LeadError::Transport("lead ledger lock poisoned".to_string())
}
