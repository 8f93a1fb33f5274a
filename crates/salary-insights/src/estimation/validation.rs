use super::domain::{FieldErrors, ProfileField, RoleProfile, ValidationResult};
use super::tables::SalaryTables;

/// Checks the three table-backed fields and reports every failure at once.
pub(crate) fn validate_profile(profile: &RoleProfile, tables: &SalaryTables) -> ValidationResult {
    let mut errors = FieldErrors::default();

    check_field(
        &mut errors,
        ProfileField::Position,
        &profile.position,
        |value| tables.position(value).is_some(),
    );
    check_field(
        &mut errors,
        ProfileField::Location,
        &profile.location,
        |value| tables.location_multiplier(value).is_some(),
    );
    check_field(
        &mut errors,
        ProfileField::Industry,
        &profile.industry,
        |value| tables.industry_multiplier(value).is_some(),
    );

    if errors.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid(errors)
    }
}

fn check_field(
    errors: &mut FieldErrors,
    field: ProfileField,
    raw: &str,
    known: impl Fn(&str) -> bool,
) {
    let value = raw.trim();
    if value.is_empty() {
        errors.insert(field, format!("{} is required", field.key()));
    } else if !known(value) {
        errors.insert(field, format!("unknown {} '{}'", field.key(), value));
    }
}
