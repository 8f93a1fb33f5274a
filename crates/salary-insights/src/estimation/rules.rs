use std::collections::BTreeMap;

use super::domain::RoleProfile;
use super::tables::SalaryTables;
use super::{EstimateBreakdown, EstimationError, SalaryEstimate};

/// Lower edge of the estimate band relative to the point estimate.
pub const RANGE_FLOOR: f64 = 0.85;
/// Upper edge of the estimate band relative to the point estimate.
pub const RANGE_CEILING: f64 = 1.15;

const NEUTRAL: f64 = 1.0;

pub(crate) fn estimate_profile(
    profile: &RoleProfile,
    tables: &SalaryTables,
) -> Result<SalaryEstimate, EstimationError> {
    let position = profile.position.trim();
    let band = tables
        .position(position)
        .ok_or_else(|| EstimationError::UnknownPosition(position.to_string()))?;

    // Missing optional entries fall back to neutral; only the position is fatal here.
    let breakdown = EstimateBreakdown {
        base: band.base,
        experience: tables
            .experience_multiplier(&profile.experience)
            .unwrap_or(NEUTRAL),
        location: tables
            .location_multiplier(&profile.location)
            .unwrap_or(NEUTRAL),
        education: tables
            .education_multiplier(&profile.education)
            .unwrap_or(NEUTRAL),
        company_size: tables
            .company_size_multiplier(&profile.company_size)
            .unwrap_or(NEUTRAL),
        industry: tables
            .industry_multiplier(&profile.industry)
            .unwrap_or(NEUTRAL),
    };

    let matched_skills: BTreeMap<String, u64> = profile
        .normalized_skills()
        .into_iter()
        .filter_map(|skill| {
            tables
                .skill_bonus(skill)
                .map(|bonus| (skill.to_string(), bonus))
        })
        .collect();
    let skills_bonus = matched_skills
        .values()
        .fold(0u64, |total, bonus| total.saturating_add(*bonus));

    let adjusted = round_currency(breakdown.adjusted_base());
    let point_estimate = adjusted.saturating_add(skills_bonus);

    Ok(SalaryEstimate {
        position: position.to_string(),
        experience: profile.experience.trim().to_string(),
        location: profile.location.trim().to_string(),
        industry: profile.industry.trim().to_string(),
        education: profile.education.trim().to_string(),
        company_size: profile.company_size.trim().to_string(),
        point_estimate,
        min_estimate: round_currency(point_estimate as f64 * RANGE_FLOOR),
        max_estimate: round_currency(point_estimate as f64 * RANGE_CEILING),
        skills_bonus,
        matched_skills,
        breakdown,
        market_trend: tables.market_trend(position),
        currency: tables.currency.clone(),
        tables_version: tables.version.clone(),
    })
}

/// Rounds half away from zero; the multipliers are non-negative so the result is too.
pub(crate) fn round_currency(amount: f64) -> u64 {
    amount.round().max(0.0) as u64
}
