use metrics_exporter_prometheus::PrometheusHandle;
use salary_insights::config::ReferenceDataConfig;
use salary_insights::error::AppError;
use salary_insights::estimation::{LeadError, LeadSink, LeadSubmission, SalaryTables};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Most recent leads retained by [`InMemoryLeadSink`] when no ledger is configured.
pub(crate) const RECENT_LEAD_CAPACITY: usize = 256;

/// Keeps the most recent leads in process memory; the oldest is dropped once full.
#[derive(Clone)]
pub(crate) struct InMemoryLeadSink {
    leads: Arc<Mutex<VecDeque<LeadSubmission>>>,
    capacity: usize,
}

impl Default for InMemoryLeadSink {
    fn default() -> Self {
        Self::with_capacity(RECENT_LEAD_CAPACITY)
    }
}

impl LeadSink for InMemoryLeadSink {
    fn submit(&self, lead: LeadSubmission) -> Result<(), LeadError> {
        let mut guard = self
            .leads
            .lock()
            .map_err(|_| LeadError::Transport("lead store lock poisoned".to_string()))?;
        info!(
            email = %lead.contact.email,
            has_estimate = lead.estimate.is_some(),
            "lead captured in memory"
        );
        while guard.len() >= self.capacity {
            guard.pop_front();
        }
        if self.capacity > 0 {
            guard.push_back(lead);
        }
        Ok(())
    }
}

impl InMemoryLeadSink {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            leads: Arc::new(Mutex::new(VecDeque::with_capacity(
                capacity.min(RECENT_LEAD_CAPACITY),
            ))),
            capacity,
        }
    }

    #[cfg(test)]
    pub(crate) fn leads(&self) -> Vec<LeadSubmission> {
        self.leads
            .lock()
            .expect("lead mutex poisoned")
            .iter()
            .cloned()
            .collect()
    }
}

pub(crate) fn load_tables(config: &ReferenceDataConfig) -> Result<SalaryTables, AppError> {
    load_tables_from(config.tables_path.as_deref())
}

pub(crate) fn load_tables_from(path: Option<&Path>) -> Result<SalaryTables, AppError> {
    let tables = match path {
        Some(path) => SalaryTables::from_path(path)?,
        None => SalaryTables::embedded()?,
    };
    let source = path
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "embedded".to_string());
    info!(
        version = %tables.version,
        positions = tables.positions.len(),
        %source,
        "salary reference tables loaded"
    );
    Ok(tables)
}
