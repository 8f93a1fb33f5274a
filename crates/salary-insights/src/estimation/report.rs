use std::fmt::Write as _;

use chrono::{Local, NaiveDate};

use super::domain::{CompanySize, EducationLevel, ExperienceBand};
use super::leads::ContactRecord;
use super::SalaryEstimate;

/// Document produced for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub content_type: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Document generator seam. The engine never depends on the output format.
pub trait ReportRenderer: Send + Sync {
    fn render(
        &self,
        estimate: &SalaryEstimate,
        contact: &ContactRecord,
    ) -> Result<RenderedReport, ReportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report rendering failed: {0}")]
    Rendering(String),
    #[error("report formatting failed")]
    Format(#[from] std::fmt::Error),
}

/// Renders the salary report as a plain-text document.
#[derive(Debug, Clone, Default)]
pub struct PlainTextReportRenderer {
    generated_on: Option<NaiveDate>,
}

impl PlainTextReportRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the generation date, mainly for reproducible output.
    pub fn dated(generated_on: NaiveDate) -> Self {
        Self {
            generated_on: Some(generated_on),
        }
    }

    fn body(
        &self,
        estimate: &SalaryEstimate,
        contact: &ContactRecord,
    ) -> Result<String, std::fmt::Error> {
        let generated_on = self
            .generated_on
            .unwrap_or_else(|| Local::now().date_naive());
        let money = |amount: u64| format_amount(amount, &estimate.currency);
        let mut out = String::new();

        writeln!(out, "Salary Estimate Report")?;
        writeln!(out, "Prepared for {} on {}", contact.name.trim(), generated_on)?;
        if let Some(company) = contact.company.as_deref().filter(|c| !c.trim().is_empty()) {
            writeln!(out, "Company: {}", company.trim())?;
        }

        writeln!(out, "\nRole profile")?;
        writeln!(out, "- Position: {}", estimate.position)?;
        writeln!(
            out,
            "- Experience: {}",
            ExperienceBand::parse(&estimate.experience)
                .map(ExperienceBand::label)
                .unwrap_or(estimate.experience.as_str())
        )?;
        writeln!(out, "- Location: {}", estimate.location)?;
        writeln!(out, "- Industry: {}", estimate.industry)?;
        writeln!(
            out,
            "- Education: {}",
            EducationLevel::parse(&estimate.education)
                .map(EducationLevel::label)
                .unwrap_or(estimate.education.as_str())
        )?;
        writeln!(
            out,
            "- Company size: {}",
            CompanySize::parse(&estimate.company_size)
                .map(CompanySize::label)
                .unwrap_or(estimate.company_size.as_str())
        )?;

        writeln!(out, "\nEstimated annual salary")?;
        writeln!(out, "- Point estimate: {}", money(estimate.point_estimate))?;
        writeln!(
            out,
            "- Expected range: {} to {}",
            money(estimate.min_estimate),
            money(estimate.max_estimate)
        )?;

        let breakdown = &estimate.breakdown;
        writeln!(out, "\nHow this was calculated")?;
        writeln!(out, "- Base salary: {}", money(breakdown.base))?;
        writeln!(out, "- Experience multiplier: x{:.2}", breakdown.experience)?;
        writeln!(out, "- Location multiplier: x{:.2}", breakdown.location)?;
        writeln!(out, "- Education multiplier: x{:.2}", breakdown.education)?;
        writeln!(out, "- Company size multiplier: x{:.2}", breakdown.company_size)?;
        writeln!(out, "- Industry multiplier: x{:.2}", breakdown.industry)?;

        if estimate.matched_skills.is_empty() {
            writeln!(out, "- Skills bonus: none")?;
        } else {
            writeln!(out, "- Skills bonus: {}", money(estimate.skills_bonus))?;
            for (skill, bonus) in &estimate.matched_skills {
                writeln!(out, "  - {skill}: +{}", money(*bonus))?;
            }
        }

        if let Some(trend) = estimate.market_trend {
            writeln!(out, "\nMarket trend")?;
            writeln!(
                out,
                "- Salaries for this role are {} ({:.1}% per year)",
                trend.direction.label(),
                trend.annual_percentage
            )?;
        }

        writeln!(
            out,
            "\nFigures use reference data version {} and are indicative only.",
            estimate.tables_version
        )?;

        Ok(out)
    }
}

impl ReportRenderer for PlainTextReportRenderer {
    fn render(
        &self,
        estimate: &SalaryEstimate,
        contact: &ContactRecord,
    ) -> Result<RenderedReport, ReportError> {
        let body = self.body(estimate, contact)?;

        Ok(RenderedReport {
            content_type: mime::TEXT_PLAIN_UTF_8.to_string(),
            file_name: report_file_name(&estimate.position),
            bytes: body.into_bytes(),
        })
    }
}

fn report_file_name(position: &str) -> String {
    let slug = position
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "salary-report.txt".to_string()
    } else {
        format!("salary-report-{slug}.txt")
    }
}

/// Groups digits the way the currency is usually written (lakh grouping for INR).
pub fn format_amount(amount: u64, currency: &str) -> String {
    let digits = amount.to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let step = if currency.eq_ignore_ascii_case("INR") {
            2
        } else {
            3
        };
        let mut groups = Vec::new();
        let mut rest = head;
        while rest.len() > step {
            let (front, back) = rest.split_at(rest.len() - step);
            groups.push(back);
            rest = front;
        }
        groups.push(rest);
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };
    format!("{currency} {grouped}")
}
