//! Domain-specific payloads carried alongside the common assessment fields.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::assessment::{Domain, TrendDirection};
use crate::entities::{AcmgClassification, ImagingModality};

/// Tagged per-domain details. The tag is the domain key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "domain", rename_all = "snake_case")]
pub enum DomainDetails {
    Diabetes(DiabetesDetails),
    Cardiovascular(CardiovascularDetails),
    Imaging(ImagingDetails),
    ClinicalNotes(ClinicalNoteDetails),
    Genomics(GenomicsDetails),
}

impl DomainDetails {
    pub fn domain(&self) -> Domain {
        match self {
            DomainDetails::Diabetes(_)       => Domain::Diabetes,
            DomainDetails::Cardiovascular(_) => Domain::Cardiovascular,
            DomainDetails::Imaging(_)        => Domain::Imaging,
            DomainDetails::ClinicalNotes(_)  => Domain::ClinicalNotes,
            DomainDetails::Genomics(_)       => Domain::Genomics,
        }
    }
}

// ── Diabetes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiabetesClassification {
    Normal,
    PreDiabetic,
    Diabetic,
}

impl DiabetesClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiabetesClassification::Normal      => "NORMAL",
            DiabetesClassification::PreDiabetic => "PRE_DIABETIC",
            DiabetesClassification::Diabetic    => "DIABETIC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct A1cTrend {
    pub direction: TrendDirection,
    pub change: f64,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiabetesDetails {
    pub classification: DiabetesClassification,
    pub trend: Option<A1cTrend>,
    pub a1c: f64,
    pub glucose: f64,
    pub thresholds: BTreeMap<String, String>,
}

// ── Cardiovascular ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardiovascularDetails {
    pub ten_year_risk_percent: f64,
    pub ldl: f64,
    pub hdl: f64,
    pub total_cholesterol: f64,
    pub triglycerides: f64,
    pub blood_pressure: String,
    /// Total cholesterol / HDL; informational only.
    pub cholesterol_ratio: f64,
    pub thresholds: BTreeMap<String, String>,
}

// ── Imaging ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingSeverity {
    Normal,
    Low,
    Moderate,
    High,
    Critical,
}

impl FindingSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingSeverity::Normal   => "NORMAL",
            FindingSeverity::Low      => "LOW",
            FindingSeverity::Moderate => "MODERATE",
            FindingSeverity::High     => "HIGH",
            FindingSeverity::Critical => "CRITICAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityGrade {
    Excellent,
    Good,
    Adequate,
}

impl QualityGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityGrade::Excellent => "EXCELLENT",
            QualityGrade::Good      => "GOOD",
            QualityGrade::Adequate  => "ADEQUATE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagingFinding {
    pub finding: String,
    pub severity: FindingSeverity,
    pub probability: f64,
    pub description: String,
    pub staging: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagingDetails {
    pub modality: ImagingModality,
    pub body_part: String,
    /// Catalog entry actually used, e.g. `XRAY/CHEST` after fallback.
    pub catalog_key: String,
    pub abnormality_score: f64,
    pub findings: Vec<ImagingFinding>,
    pub primary_finding: String,
    pub severity: FindingSeverity,
    pub quality_score: f64,
    pub quality_grade: QualityGrade,
    pub staging: Vec<String>,
    pub requires_follow_up: bool,
    pub report: String,
}

// ── Clinical notes ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionSeverity {
    Low,
    Moderate,
    Chronic,
    High,
    Critical,
}

impl ConditionSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionSeverity::Low      => "LOW",
            ConditionSeverity::Moderate => "MODERATE",
            ConditionSeverity::Chronic  => "CHRONIC",
            ConditionSeverity::High     => "HIGH",
            ConditionSeverity::Critical => "CRITICAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthTrend {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionAnalysis {
    pub condition: String,
    pub severity: ConditionSeverity,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalNoteDetails {
    pub condition_analysis: Vec<ConditionAnalysis>,
    pub highest_severity: ConditionSeverity,
    pub conditions_count: usize,
    pub medications_count: usize,
    pub symptoms_count: usize,
    pub health_trend: HealthTrend,
    pub sentiment_score: f64,
    pub complexity_score: f64,
    pub insights: Vec<String>,
}

// ── Genomics ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Inheritance {
    AutosomalDominant,
    AutosomalRecessive,
    XLinked,
}

impl Inheritance {
    pub fn describe(&self) -> &'static str {
        match self {
            Inheritance::AutosomalDominant  => "autosomal dominant",
            Inheritance::AutosomalRecessive => "autosomal recessive",
            Inheritance::XLinked            => "X-linked",
        }
    }
}

/// Read-only annotation of one input variant. The input itself is never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedVariant {
    pub gene: String,
    pub variant: Option<String>,
    pub classification: AcmgClassification,
    /// Classification used for risk; unknown genes count as VUS.
    pub effective_classification: AcmgClassification,
    pub acmg_tier: u8,
    pub known_gene: bool,
    pub actionable: bool,
    pub inheritance: Option<Inheritance>,
    pub cancer_syndrome: Option<String>,
    pub lifetime_risk_increase: Option<f64>,
    pub conditions: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HereditarySyndrome {
    pub name: String,
    pub code: String,
    pub matched_genes: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomicsDetails {
    pub annotated_variants: Vec<AnnotatedVariant>,
    pub hereditary_syndromes: Vec<HereditarySyndrome>,
    pub pathogenic_count: usize,
    pub likely_pathogenic_count: usize,
    pub vus_count: usize,
    pub total_variants: usize,
    pub cancer_risk_score: f64,
    pub associated_conditions: BTreeSet<String>,
    pub cancer_related_conditions: BTreeSet<String>,
    pub message: Option<String>,
}
