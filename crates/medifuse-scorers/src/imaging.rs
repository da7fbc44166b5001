//! Imaging finding selection and severity scoring.
//!
//! Finding selection is a pure function of (modality, body part, abnormality
//! score): the index into the catalog comes from a SHA-256 digest of those
//! fields, so identical studies always yield identical findings.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use medifuse_common::assessment::{
    DomainDetails, FindingSeverity, ImagingDetails, ImagingFinding, QualityGrade, MODEL_VERSION,
};
use medifuse_common::confidence::quality_adjusted;
use medifuse_common::util::{dedup_capped, round3};
use medifuse_common::{
    DataModality, Domain, Factor, Impact, ImagingModality, ImagingRecord, MedifuseError,
    PatientBundle, PredictionType, Result, RiskAssessment, RiskLevel,
};
use medifuse_reference::{finding_catalog, severity_recommendations, severity_risk_score, CatalogFinding};
use sha2::{Digest, Sha256};

use crate::scorer::{FromBundle, Scorer};

pub const DEFAULT_ABNORMALITY_SCORE: f64 = 0.2;
pub const DEFAULT_BODY_PART: &str = "CHEST";

const NORMAL_BELOW: f64 = 0.3;
const SINGLE_FINDING_BELOW: f64 = 0.6;
const BASE_CONFIDENCE: f64 = 0.85;

const URGENT_RECOMMENDATIONS: [&str; 2] = [
    "Urgent specialist consultation recommended",
    "Additional imaging or biopsy may be needed",
];

impl FromBundle for ImagingRecord {
    fn from_bundle(bundle: &PatientBundle) -> Result<Self> {
        let record = bundle
            .latest_imaging()
            .ok_or_else(|| MedifuseError::malformed(Domain::Imaging, "no imaging study"))?;
        record.validate()?;
        Ok(record.clone())
    }
}

/// Stable digest of the fields that determine finding selection.
struct StudyDigest([u8; 32]);

impl StudyDigest {
    fn new(modality: ImagingModality, body_part: &str, score: f64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(format!("{}|{}|{:.6}", modality.as_str(), body_part, score).as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    fn word(&self, n: usize) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.0[n * 8..n * 8 + 8]);
        u64::from_be_bytes(bytes)
    }

    fn selection_index(&self, len: usize) -> usize {
        (self.word(0) % len as u64) as usize
    }

    /// Secondary quality score in [0.7, 1.0].
    fn quality(&self) -> f64 {
        0.7 + (self.word(1) % 301) as f64 / 1000.0
    }
}

fn normalise_body_part(body_part: &str) -> String {
    let trimmed = body_part.trim();
    if trimmed.is_empty() {
        DEFAULT_BODY_PART.to_string()
    } else {
        trimmed.to_ascii_uppercase()
    }
}

fn quality_grade(quality: f64) -> QualityGrade {
    if quality >= 0.95 {
        QualityGrade::Excellent
    } else if quality >= 0.85 {
        QualityGrade::Good
    } else {
        QualityGrade::Adequate
    }
}

fn risk_level_for(severity: FindingSeverity) -> RiskLevel {
    match severity {
        FindingSeverity::Normal | FindingSeverity::Low => RiskLevel::Low,
        FindingSeverity::Moderate                      => RiskLevel::Moderate,
        FindingSeverity::High                          => RiskLevel::High,
        FindingSeverity::Critical                      => RiskLevel::Critical,
    }
}

fn impact_for(severity: FindingSeverity) -> Impact {
    match severity {
        FindingSeverity::Normal | FindingSeverity::Low => Impact::Low,
        FindingSeverity::Moderate                      => Impact::Moderate,
        FindingSeverity::High | FindingSeverity::Critical => Impact::High,
    }
}

fn to_finding(f: &CatalogFinding) -> ImagingFinding {
    ImagingFinding {
        finding: f.finding.to_string(),
        severity: f.severity,
        probability: f.probability,
        description: f.description.to_string(),
        staging: f.staging.map(str::to_string),
    }
}

/// Pick findings for a study: the NORMAL finding below 0.3, otherwise one
/// (below 0.6) or two consecutive abnormal findings starting at the digest index.
fn select_findings(
    abnormal: &[&'static CatalogFinding],
    normal: &'static CatalogFinding,
    score: f64,
    digest: &StudyDigest,
) -> Vec<&'static CatalogFinding> {
    if score < NORMAL_BELOW || abnormal.is_empty() {
        return vec![normal];
    }
    let wanted = if score < SINGLE_FINDING_BELOW { 1 } else { 2 };
    let count = wanted.min(abnormal.len());
    let start = digest.selection_index(abnormal.len());
    (0..count).map(|i| abnormal[(start + i) % abnormal.len()]).collect()
}

fn render_report(details: &ImagingDetails) -> String {
    let mut report = String::new();
    let _ = writeln!(report, "{} {} study", details.modality, details.body_part);
    let _ = writeln!(
        report,
        "Image quality: {} ({:.2})",
        details.quality_grade.as_str(),
        details.quality_score
    );
    let _ = writeln!(report, "Findings:");
    for (i, f) in details.findings.iter().enumerate() {
        let _ = writeln!(report, "  {}. {} [{}] - {}", i + 1, f.finding, f.severity.as_str(), f.description);
    }
    if !details.staging.is_empty() {
        let _ = writeln!(report, "Staging: {}", details.staging.join("; "));
    }
    let _ = write!(
        report,
        "Impression: {} ({} severity)",
        details.primary_finding,
        details.severity.as_str()
    );
    report
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImagingScorer;

impl Scorer for ImagingScorer {
    type Input = ImagingRecord;

    const DOMAIN: Domain = Domain::Imaging;

    fn score(&self, record: &ImagingRecord) -> RiskAssessment {
        let body_part = normalise_body_part(&record.body_part);
        let score = record
            .abnormality_score
            .filter(|s| s.is_finite())
            .unwrap_or(DEFAULT_ABNORMALITY_SCORE)
            .clamp(0.0, 1.0);

        let catalog = finding_catalog(record.modality, &body_part);
        let digest = StudyDigest::new(record.modality, &body_part, score);
        let abnormal = catalog.abnormal_findings();
        let selected = select_findings(&abnormal, catalog.normal_finding(), score, &digest);

        let severity = selected
            .iter()
            .map(|f| f.severity)
            .max()
            .unwrap_or(FindingSeverity::Normal);
        let staging: Vec<String> = selected
            .iter()
            .filter_map(|f| f.staging.map(str::to_string))
            .collect();

        let factors = selected
            .iter()
            .filter(|f| f.severity != FindingSeverity::Normal)
            .map(|f| {
                Factor::new(
                    "Imaging Finding",
                    f.finding,
                    impact_for(f.severity),
                    f.description,
                )
            })
            .collect();

        let mut recommendations: Vec<&str> = Vec::new();
        if !staging.is_empty() {
            recommendations.extend(URGENT_RECOMMENDATIONS);
        }
        recommendations.extend(severity_recommendations(severity));

        let quality = round3(digest.quality());
        let mut details = ImagingDetails {
            modality: record.modality,
            body_part,
            catalog_key: catalog.key(),
            abnormality_score: score,
            findings: selected.iter().map(|f| to_finding(f)).collect(),
            primary_finding: selected[0].finding.to_string(),
            severity,
            quality_score: quality,
            quality_grade: quality_grade(quality),
            staging,
            requires_follow_up: severity >= FindingSeverity::Moderate,
            report: String::new(),
        };
        details.report = render_report(&details);

        RiskAssessment {
            prediction_type: PredictionType::ImagingAnalysis,
            risk_score: severity_risk_score(severity),
            risk_level: risk_level_for(severity),
            confidence: round3(quality_adjusted(BASE_CONFIDENCE, quality)),
            contributing_factors: factors,
            recommendations: dedup_capped(recommendations, usize::MAX),
            modalities_used: BTreeSet::from([DataModality::Imaging]),
            details: DomainDetails::Imaging(details),
            model_version: MODEL_VERSION.to_string(),
        }
    }
}
