use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw role profile as submitted by the salary calculator form.
///
/// Every field is kept as the string the visitor supplied. Required fields are
/// checked by validation; the optional dimensions resolve leniently during estimation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProfile {
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default = "default_education")]
    pub education: String,
    #[serde(default = "default_company_size")]
    pub company_size: String,
    #[serde(default)]
    pub skills: BTreeSet<String>,
}

fn default_education() -> String {
    EducationLevel::Bachelor.key().to_string()
}

fn default_company_size() -> String {
    CompanySize::Small.key().to_string()
}

impl RoleProfile {
    pub fn new(
        position: impl Into<String>,
        experience: impl Into<String>,
        location: impl Into<String>,
        industry: impl Into<String>,
    ) -> Self {
        Self {
            position: position.into(),
            experience: experience.into(),
            location: location.into(),
            industry: industry.into(),
            education: default_education(),
            company_size: default_company_size(),
            skills: BTreeSet::new(),
        }
    }

    pub fn with_education(mut self, education: impl Into<String>) -> Self {
        self.education = education.into();
        self
    }

    pub fn with_company_size(mut self, company_size: impl Into<String>) -> Self {
        self.company_size = company_size.into();
        self
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.insert(skill.into());
        self
    }

    /// Skills after trimming, with blanks dropped and duplicates collapsed.
    pub fn normalized_skills(&self) -> BTreeSet<&str> {
        self.skills
            .iter()
            .map(|skill| skill.trim())
            .filter(|skill| !skill.is_empty())
            .collect()
    }
}

/// Experience bands offered by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExperienceBand {
    #[serde(rename = "0-1")]
    UnderOne,
    #[serde(rename = "1-3")]
    OneToThree,
    #[serde(rename = "3-5")]
    ThreeToFive,
    #[serde(rename = "5-8")]
    FiveToEight,
    #[serde(rename = "8-10")]
    EightToTen,
    #[serde(rename = "10+")]
    TenPlus,
}

impl ExperienceBand {
    pub fn ordered() -> [Self; 6] {
        [
            Self::UnderOne,
            Self::OneToThree,
            Self::ThreeToFive,
            Self::FiveToEight,
            Self::EightToTen,
            Self::TenPlus,
        ]
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::UnderOne => "0-1",
            Self::OneToThree => "1-3",
            Self::ThreeToFive => "3-5",
            Self::FiveToEight => "5-8",
            Self::EightToTen => "8-10",
            Self::TenPlus => "10+",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UnderOne => "0-1 years",
            Self::OneToThree => "1-3 years",
            Self::ThreeToFive => "3-5 years",
            Self::FiveToEight => "5-8 years",
            Self::EightToTen => "8-10 years",
            Self::TenPlus => "10+ years",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ordered().into_iter().find(|band| band.key() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    Diploma,
    Bachelor,
    Master,
    Mba,
    Phd,
}

impl EducationLevel {
    pub fn ordered() -> [Self; 6] {
        [
            Self::HighSchool,
            Self::Diploma,
            Self::Bachelor,
            Self::Master,
            Self::Mba,
            Self::Phd,
        ]
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::HighSchool => "high_school",
            Self::Diploma => "diploma",
            Self::Bachelor => "bachelor",
            Self::Master => "master",
            Self::Mba => "mba",
            Self::Phd => "phd",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::HighSchool => "High school",
            Self::Diploma => "Diploma",
            Self::Bachelor => "Bachelor's degree",
            Self::Master => "Master's degree",
            Self::Mba => "MBA",
            Self::Phd => "PhD",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|level| level.key().eq_ignore_ascii_case(raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanySize {
    Startup,
    Small,
    Medium,
    Large,
    Enterprise,
}

impl CompanySize {
    pub fn ordered() -> [Self; 5] {
        [
            Self::Startup,
            Self::Small,
            Self::Medium,
            Self::Large,
            Self::Enterprise,
        ]
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Enterprise => "enterprise",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Startup => "Startup",
            Self::Small => "Small (up to 200)",
            Self::Medium => "Medium (200-1000)",
            Self::Large => "Large (1000-5000)",
            Self::Enterprise => "Enterprise (5000+)",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|size| size.key().eq_ignore_ascii_case(raw))
    }
}

/// Profile fields that must resolve against a reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Position,
    Location,
    Industry,
}

impl ProfileField {
    pub fn key(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Location => "location",
            Self::Industry => "industry",
        }
    }
}

/// Per-field validation messages, one entry per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<ProfileField, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: ProfileField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: ProfileField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: ProfileField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProfileField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .iter()
            .map(|(field, message)| format!("{}: {}", field.key(), message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

/// Outcome of checking a profile before estimation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(FieldErrors),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Valid => None,
            Self::Invalid(errors) => Some(errors),
        }
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(errors) => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_defaults_fill_optional_dimensions() {
        let profile: RoleProfile = serde_json::from_str(
            r#"{"position":"HR Manager","experience":"1-3","location":"Pune","industry":"other"}"#,
        )
        .expect("profile parses");

        assert_eq!(profile.education, "bachelor");
        assert_eq!(profile.company_size, "small");
        assert!(profile.skills.is_empty());
    }

    #[test]
    fn missing_required_fields_deserialize_as_blank() {
        let profile: RoleProfile = serde_json::from_str("{}").expect("empty object parses");
        assert!(profile.position.is_empty());
        assert!(profile.location.is_empty());
        assert!(profile.industry.is_empty());
    }

    #[test]
    fn duplicate_skills_collapse() {
        let profile: RoleProfile = serde_json::from_str(
            r#"{"position":"HR Manager","skills":["Workday"," Workday","Workday",""]}"#,
        )
        .expect("profile parses");

        assert_eq!(profile.normalized_skills().len(), 1);
    }

    #[test]
    fn experience_band_parses_form_keys() {
        assert_eq!(ExperienceBand::parse("10+"), Some(ExperienceBand::TenPlus));
        assert_eq!(ExperienceBand::parse(" 3-5 "), Some(ExperienceBand::ThreeToFive));
        assert_eq!(ExperienceBand::parse("15+"), None);
    }

    #[test]
    fn education_and_size_parse_case_insensitively() {
        assert_eq!(EducationLevel::parse("MBA"), Some(EducationLevel::Mba));
        assert_eq!(CompanySize::parse("Enterprise"), Some(CompanySize::Enterprise));
        assert_eq!(CompanySize::parse("gigantic"), None);
    }

    #[test]
    fn field_errors_serialize_as_flat_map() {
        let mut errors = FieldErrors::default();
        errors.insert(ProfileField::Industry, "unknown industry 'space'");
        errors.insert(ProfileField::Position, "position is required");

        let json = serde_json::to_value(&errors).expect("serializes");
        assert_eq!(json["position"], "position is required");
        assert_eq!(json["industry"], "unknown industry 'space'");
        assert_eq!(
            errors.to_string(),
            "position: position is required; industry: unknown industry 'space'"
        );
    }
}
