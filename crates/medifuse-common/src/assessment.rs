/// Assessment value objects produced by the scorers and the fusion engine.
/// Every assessment is built fresh per invocation; nothing here is cached or mutated in place.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::DataModality;

pub use crate::details::*;

/// Version stamped on every assessment the engine produces.
pub const MODEL_VERSION: &str = "1.0.0";

// ---------------------------------------------------------------------------
// Risk level / impact
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Bucket a score against three ascending cut points.
    /// Each cut point is exclusive: a score equal to `high_at` is HIGH.
    pub fn bucket(score: f64, moderate_at: f64, high_at: f64, critical_at: f64) -> Self {
        if score < moderate_at {
            RiskLevel::Low
        } else if score < high_at {
            RiskLevel::Moderate
        } else if score < critical_at {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low      => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High     => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Impact {
    Low,
    Moderate,
    High,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Low      => "LOW",
            Impact::Moderate => "MODERATE",
            Impact::High     => "HIGH",
        }
    }
}

/// One explanatory contribution to a risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub name: String,
    pub observed_value: String,
    pub impact: Impact,
    pub rationale: String,
}

impl Factor {
    pub fn new(name: &str, observed_value: impl Into<String>, impact: Impact, rationale: &str) -> Self {
        Self {
            name: name.to_string(),
            observed_value: observed_value.into(),
            impact,
            rationale: rationale.to_string(),
        }
    }

    /// Flat form used by the persistence layer.
    pub fn to_line(&self) -> String {
        format!(
            "{}: {} ({}) - {}",
            self.name,
            self.observed_value,
            self.impact.as_str(),
            self.rationale
        )
    }
}

// ---------------------------------------------------------------------------
// Domains
// ---------------------------------------------------------------------------

/// Scoring domains, declared in scorer invocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Diabetes,
    Cardiovascular,
    Imaging,
    ClinicalNotes,
    Genomics,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Diabetes,
        Domain::Cardiovascular,
        Domain::Imaging,
        Domain::ClinicalNotes,
        Domain::Genomics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Diabetes       => "diabetes",
            Domain::Cardiovascular => "cardiovascular",
            Domain::Imaging        => "imaging",
            Domain::ClinicalNotes  => "clinical_notes",
            Domain::Genomics       => "genomics",
        }
    }

    /// The input modality a domain's scorer consumes.
    pub fn modality(&self) -> DataModality {
        match self {
            Domain::Diabetes | Domain::Cardiovascular => DataModality::Labs,
            Domain::Imaging                           => DataModality::Imaging,
            Domain::ClinicalNotes                     => DataModality::ClinicalNotes,
            Domain::Genomics                          => DataModality::Genomics,
        }
    }

    pub fn prediction_type(&self) -> PredictionType {
        match self {
            Domain::Diabetes       => PredictionType::DiabetesRisk,
            Domain::Cardiovascular => PredictionType::CardiovascularRisk,
            Domain::Imaging        => PredictionType::ImagingAnalysis,
            Domain::ClinicalNotes  => PredictionType::ClinicalNlpAnalysis,
            Domain::Genomics       => PredictionType::GenomicsRisk,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictionType {
    DiabetesRisk,
    CardiovascularRisk,
    ImagingAnalysis,
    ClinicalNlpAnalysis,
    GenomicsRisk,
    MultiModalFusion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    /// Direction from endpoints only: any difference counts.
    pub fn from_endpoints(first: f64, last: f64) -> Self {
        if last > first {
            TrendDirection::Increasing
        } else if last < first {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }

    /// Direction from a percent change, treating |change| below `stable_band` as stable.
    pub fn from_percent_change(percent_change: f64, stable_band: f64) -> Self {
        if percent_change >= stable_band {
            TrendDirection::Increasing
        } else if percent_change <= -stable_band {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }
}

// ---------------------------------------------------------------------------
// Per-domain assessment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub prediction_type: PredictionType,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub contributing_factors: Vec<Factor>,
    pub recommendations: Vec<String>,
    pub modalities_used: BTreeSet<DataModality>,
    pub details: DomainDetails,
    pub model_version: String,
}

impl RiskAssessment {
    pub fn domain(&self) -> Domain {
        self.details.domain()
    }

    pub fn factor_lines(&self) -> Vec<String> {
        self.contributing_factors.iter().map(Factor::to_line).collect()
    }
}

/// A domain whose scorer was scheduled but produced no assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedDomain {
    pub domain: Domain,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Fused assessment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedAssessment {
    pub prediction_type: PredictionType,
    pub overall_risk_score: f64,
    pub overall_risk_level: RiskLevel,
    pub confidence: f64,
    pub domain_assessments: BTreeMap<Domain, RiskAssessment>,
    pub contributing_factors: Vec<Factor>,
    pub recommendations: Vec<String>,
    pub modalities_used: BTreeSet<DataModality>,
    #[serde(default)]
    pub skipped_domains: Vec<SkippedDomain>,
    pub summary: String,
    pub model_version: String,
}

impl FusedAssessment {
    pub fn domains(&self) -> Vec<Domain> {
        self.domain_assessments.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries_are_exclusive() {
        assert_eq!(RiskLevel::bucket(0.19, 0.2, 0.5, 0.75), RiskLevel::Low);
        assert_eq!(RiskLevel::bucket(0.2, 0.2, 0.5, 0.75), RiskLevel::Moderate);
        assert_eq!(RiskLevel::bucket(0.5, 0.2, 0.5, 0.75), RiskLevel::High);
        assert_eq!(RiskLevel::bucket(0.75, 0.2, 0.5, 0.75), RiskLevel::Critical);
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Critical > RiskLevel::High);
        assert!(RiskLevel::Moderate > RiskLevel::Low);
    }

    #[test]
    fn test_domain_keys_serialize_snake_case() {
        let json = serde_json::to_string(&Domain::ClinicalNotes).unwrap();
        assert_eq!(json, "\"clinical_notes\"");
        assert_eq!(Domain::Cardiovascular.modality(), DataModality::Labs);
    }

    #[test]
    fn test_trend_direction_from_percent_change() {
        assert_eq!(TrendDirection::from_percent_change(20.0, 2.0), TrendDirection::Increasing);
        assert_eq!(TrendDirection::from_percent_change(-1.5, 2.0), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_percent_change(-2.0, 2.0), TrendDirection::Decreasing);
    }

    #[test]
    fn test_factor_line() {
        let f = Factor::new("Smoking", "Active smoker", Impact::High, "Raises risk");
        assert_eq!(f.to_line(), "Smoking: Active smoker (HIGH) - Raises risk");
    }
}
