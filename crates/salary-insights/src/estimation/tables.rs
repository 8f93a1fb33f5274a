use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{CompanySize, EducationLevel, ExperienceBand};

const EMBEDDED_TABLES: &str = include_str!("../../data/salary_tables.json");

/// Base pay data for a position.
///
/// `range` and `max` are carried for display only; the estimate band is a fixed
/// percentage of the point estimate and never reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionBand {
    pub base: u64,
    pub range: u64,
    pub max: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "rising",
            Self::Down => "declining",
            Self::Stable => "stable",
        }
    }
}

/// Year-on-year salary movement for a position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketTrend {
    pub direction: TrendDirection,
    pub annual_percentage: f64,
}

/// Versioned, read-only reference data behind every estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryTables {
    pub version: String,
    pub currency: String,
    pub positions: BTreeMap<String, PositionBand>,
    pub experience: BTreeMap<ExperienceBand, f64>,
    pub locations: BTreeMap<String, f64>,
    pub education: BTreeMap<EducationLevel, f64>,
    pub company_size: BTreeMap<CompanySize, f64>,
    pub industries: BTreeMap<String, f64>,
    #[serde(default)]
    pub skills: BTreeMap<String, u64>,
    #[serde(default)]
    pub market_trends: BTreeMap<String, MarketTrend>,
}

impl SalaryTables {
    /// Tables shipped with the crate.
    pub fn embedded() -> Result<Self, TableError> {
        Self::from_json_str(EMBEDDED_TABLES)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| TableError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, TableError> {
        let tables: Self = serde_json::from_str(raw)?;
        tables.check()?;
        Ok(tables)
    }

    fn check(&self) -> Result<(), TableError> {
        if self.version.trim().is_empty() {
            return Err(TableError::MissingVersion);
        }
        if self.positions.is_empty() {
            return Err(TableError::EmptyTable("positions"));
        }

        for (name, band) in &self.positions {
            if band.base == 0 {
                return Err(TableError::InvalidBase(name.clone()));
            }
        }

        check_multipliers(
            "experience",
            self.experience.iter().map(|(band, value)| (band.key(), *value)),
        )?;
        check_multipliers(
            "locations",
            self.locations.iter().map(|(key, value)| (key.as_str(), *value)),
        )?;
        check_multipliers(
            "education",
            self.education.iter().map(|(level, value)| (level.key(), *value)),
        )?;
        check_multipliers(
            "company_size",
            self.company_size
                .iter()
                .map(|(size, value)| (size.key(), *value)),
        )?;
        check_multipliers(
            "industries",
            self.industries.iter().map(|(key, value)| (key.as_str(), *value)),
        )?;

        Ok(())
    }

    pub fn position(&self, name: &str) -> Option<&PositionBand> {
        self.positions.get(name.trim())
    }

    pub fn experience_multiplier(&self, raw: &str) -> Option<f64> {
        ExperienceBand::parse(raw).and_then(|band| self.experience.get(&band).copied())
    }

    pub fn location_multiplier(&self, name: &str) -> Option<f64> {
        self.locations.get(name.trim()).copied()
    }

    pub fn education_multiplier(&self, raw: &str) -> Option<f64> {
        EducationLevel::parse(raw).and_then(|level| self.education.get(&level).copied())
    }

    pub fn company_size_multiplier(&self, raw: &str) -> Option<f64> {
        CompanySize::parse(raw).and_then(|size| self.company_size.get(&size).copied())
    }

    pub fn industry_multiplier(&self, name: &str) -> Option<f64> {
        self.industries.get(name.trim()).copied()
    }

    pub fn skill_bonus(&self, skill: &str) -> Option<u64> {
        self.skills.get(skill.trim()).copied()
    }

    pub fn market_trend(&self, position: &str) -> Option<MarketTrend> {
        self.market_trends.get(position.trim()).copied()
    }

    /// Choices for each calculator dropdown.
    pub fn options(&self) -> ReferenceOptions {
        ReferenceOptions {
            version: self.version.clone(),
            currency: self.currency.clone(),
            positions: self.positions.keys().cloned().collect(),
            experience: ExperienceBand::ordered()
                .into_iter()
                .filter(|band| self.experience.contains_key(band))
                .map(|band| OptionEntry::new(band.key(), band.label()))
                .collect(),
            locations: self.locations.keys().cloned().collect(),
            education: EducationLevel::ordered()
                .into_iter()
                .filter(|level| self.education.contains_key(level))
                .map(|level| OptionEntry::new(level.key(), level.label()))
                .collect(),
            company_size: CompanySize::ordered()
                .into_iter()
                .filter(|size| self.company_size.contains_key(size))
                .map(|size| OptionEntry::new(size.key(), size.label()))
                .collect(),
            industries: self.industries.keys().cloned().collect(),
            skills: self.skills.keys().cloned().collect(),
        }
    }
}

fn check_multipliers<'a>(
    table: &'static str,
    entries: impl Iterator<Item = (&'a str, f64)>,
) -> Result<(), TableError> {
    for (key, value) in entries {
        if !value.is_finite() || value < 0.0 {
            return Err(TableError::InvalidMultiplier {
                table,
                key: key.to_string(),
                value,
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionEntry {
    pub value: &'static str,
    pub label: &'static str,
}

impl OptionEntry {
    fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// Form options derived from one table version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceOptions {
    pub version: String,
    pub currency: String,
    pub positions: Vec<String>,
    pub experience: Vec<OptionEntry>,
    pub locations: Vec<String>,
    pub education: Vec<OptionEntry>,
    pub company_size: Vec<OptionEntry>,
    pub industries: Vec<String>,
    pub skills: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("unable to read salary tables from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("salary tables are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("salary tables must declare a version")]
    MissingVersion,
    #[error("salary table '{0}' has no entries")]
    EmptyTable(&'static str),
    #[error("position '{0}' must have a positive base salary")]
    InvalidBase(String),
    #[error("multiplier {value} for '{key}' in table '{table}' must be finite and non-negative")]
    InvalidMultiplier {
        table: &'static str,
        key: String,
        value: f64,
    },
}
