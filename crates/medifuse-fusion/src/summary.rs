//! One-line human-readable summary of a fused assessment.

use medifuse_common::assessment::{DomainDetails, HealthTrend};
use medifuse_common::RiskAssessment;

/// Summary used when no domain produced an assessment.
pub const AWAITING_DATA: &str = "Awaiting data for comprehensive analysis";

fn trend_word(trend: HealthTrend) -> &'static str {
    match trend {
        HealthTrend::Improving => "improving",
        HealthTrend::Stable    => "stable",
        HealthTrend::Declining => "declining",
    }
}

/// Clause describing one domain's result.
pub fn domain_clause(assessment: &RiskAssessment) -> String {
    match &assessment.details {
        DomainDetails::Diabetes(d) => format!(
            "Diabetes risk: {} ({})",
            assessment.risk_level,
            d.classification.as_str()
        ),
        DomainDetails::Cardiovascular(d) => {
            format!("Cardiovascular: {:.1}% 10-year risk", d.ten_year_risk_percent)
        }
        DomainDetails::Imaging(d) => format!("Imaging: {}", d.primary_finding),
        DomainDetails::ClinicalNotes(d) => format!(
            "Clinical notes: {} trend, {} active conditions",
            trend_word(d.health_trend),
            d.conditions_count
        ),
        DomainDetails::Genomics(d) if d.pathogenic_count > 0 => {
            format!("Genomics: {} pathogenic variants", d.pathogenic_count)
        }
        DomainDetails::Genomics(_) => "Genomics: No high-risk variants".to_string(),
    }
}

/// Pipe-joined clauses in the order given.
pub fn summarize<'a, I>(assessments: I) -> String
where
    I: IntoIterator<Item = &'a RiskAssessment>,
{
    let clauses: Vec<String> = assessments.into_iter().map(domain_clause).collect();
    if clauses.is_empty() {
        AWAITING_DATA.to_string()
    } else {
        clauses.join(" | ")
    }
}
