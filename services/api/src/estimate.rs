use crate::infra::load_tables_from;
use clap::Args;
use salary_insights::error::AppError;
use salary_insights::estimation::report::format_amount;
use salary_insights::estimation::{
    ReferenceOptions, ReportError, RoleProfile, SalaryEstimate, SalaryEstimator, ServiceError,
};
use std::fmt::{self, Write as _};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Position title, e.g. "HR Manager"
    #[arg(long)]
    pub(crate) position: String,
    /// Experience band: 0-1, 1-3, 3-5, 5-8, 8-10 or 10+
    #[arg(long, default_value = "1-3")]
    pub(crate) experience: String,
    /// City or region, e.g. "Mumbai" or "Other"
    #[arg(long)]
    pub(crate) location: String,
    /// Industry key, e.g. "technology" or "other"
    #[arg(long)]
    pub(crate) industry: String,
    /// Education level key
    #[arg(long, default_value = "bachelor")]
    pub(crate) education: String,
    /// Company size key
    #[arg(long, default_value = "small")]
    pub(crate) company_size: String,
    /// Skill to include (repeatable)
    #[arg(long = "skill")]
    pub(crate) skills: Vec<String>,
    /// Alternative reference tables JSON file
    #[arg(long)]
    pub(crate) tables: Option<PathBuf>,
    /// Print the estimate as JSON instead of a text breakdown
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct OptionsArgs {
    /// Alternative reference tables JSON file
    #[arg(long)]
    pub(crate) tables: Option<PathBuf>,
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let tables = load_tables_from(args.tables.as_deref())?;
    let estimator = SalaryEstimator::new(tables);
    let profile = profile_from_args(&args);

    let estimate = match estimator.assess(&profile) {
        Ok(estimate) => estimate,
        Err(err) => {
            let err = ServiceError::from(err);
            if let ServiceError::Invalid(fields) = &err {
                println!("Profile rejected");
                for (field, message) in fields.iter() {
                    println!("- {}: {}", field.key(), message);
                }
            }
            return Err(err.into());
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&estimate) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Estimate unavailable as JSON: {err}"),
        }
    } else {
        print!("{}", render_estimate(&estimate).map_err(render_failed)?);
    }

    Ok(())
}

pub(crate) fn run_options(args: OptionsArgs) -> Result<(), AppError> {
    let tables = load_tables_from(args.tables.as_deref())?;
    print!("{}", render_options(&tables.options()).map_err(render_failed)?);
    Ok(())
}

fn render_failed(err: fmt::Error) -> AppError {
    ServiceError::Report(ReportError::from(err)).into()
}

fn profile_from_args(args: &EstimateArgs) -> RoleProfile {
    let mut profile = RoleProfile::new(
        args.position.as_str(),
        args.experience.as_str(),
        args.location.as_str(),
        args.industry.as_str(),
    )
    .with_education(args.education.as_str())
    .with_company_size(args.company_size.as_str());
    for skill in &args.skills {
        profile = profile.with_skill(skill.as_str());
    }
    profile
}

pub(crate) fn render_estimate(estimate: &SalaryEstimate) -> Result<String, fmt::Error> {
    let money = |amount: u64| format_amount(amount, &estimate.currency);
    let breakdown = &estimate.breakdown;
    let mut out = String::new();

    writeln!(
        out,
        "Salary estimate for {} in {} ({})",
        estimate.position, estimate.location, estimate.industry
    )?;
    writeln!(out, "Point estimate: {}", money(estimate.point_estimate))?;
    writeln!(
        out,
        "Range: {} - {}",
        money(estimate.min_estimate),
        money(estimate.max_estimate)
    )?;

    writeln!(out, "\nBreakdown")?;
    writeln!(out, "- base {}", money(breakdown.base))?;
    for (label, multiplier) in [
        ("experience", breakdown.experience),
        ("location", breakdown.location),
        ("education", breakdown.education),
        ("company size", breakdown.company_size),
        ("industry", breakdown.industry),
    ] {
        writeln!(out, "- {label} x{multiplier:.2}")?;
    }
    if estimate.matched_skills.is_empty() {
        writeln!(out, "- skills bonus: none")?;
    } else {
        writeln!(out, "- skills bonus {}", money(estimate.skills_bonus))?;
        for (skill, bonus) in &estimate.matched_skills {
            writeln!(out, "  - {skill} +{}", money(*bonus))?;
        }
    }

    match estimate.market_trend {
        Some(trend) => {
            writeln!(
                out,
                "\nMarket trend: {} {:.1}% per year",
                trend.direction.label(),
                trend.annual_percentage
            )?;
        }
        None => {
            writeln!(out, "\nMarket trend: no data")?;
        }
    }
    writeln!(out, "Reference data version {}", estimate.tables_version)?;

    Ok(out)
}

fn render_options(options: &ReferenceOptions) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "Reference data version {} ({})",
        options.version, options.currency
    )?;

    writeln!(out, "\nPositions")?;
    for position in &options.positions {
        writeln!(out, "- {position}")?;
    }
    writeln!(out, "\nExperience bands")?;
    for entry in &options.experience {
        writeln!(out, "- {} ({})", entry.value, entry.label)?;
    }
    writeln!(out, "\nLocations")?;
    for location in &options.locations {
        writeln!(out, "- {location}")?;
    }
    writeln!(out, "\nIndustries")?;
    for industry in &options.industries {
        writeln!(out, "- {industry}")?;
    }
    writeln!(out, "\nEducation levels")?;
    for entry in &options.education {
        writeln!(out, "- {} ({})", entry.value, entry.label)?;
    }
    writeln!(out, "\nCompany sizes")?;
    for entry in &options.company_size {
        writeln!(out, "- {} ({})", entry.value, entry.label)?;
    }
    writeln!(out, "\nSkills with a bonus")?;
    for skill in &options.skills {
        writeln!(out, "- {skill}")?;
    }

    Ok(out)
}
