/// Normalised clinical input records.
/// These are produced upstream (parsers, LLM extraction) and are read-only to the engine.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::Domain;
use crate::error::{MedifuseError, Result};

// ---------------------------------------------------------------------------
// Lab observations
// ---------------------------------------------------------------------------

/// Laboratory test type. Unknown types are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LabType {
    A1c,
    Glucose,
    CholesterolTotal,
    Ldl,
    Hdl,
    Triglycerides,
    BpSystolic,
    BpDiastolic,
    HeartRate,
    Creatinine,
    Hemoglobin,
    Wbc,
    Platelets,
    Other(String),
}

impl LabType {
    pub fn as_str(&self) -> &str {
        match self {
            LabType::A1c              => "A1C",
            LabType::Glucose          => "GLUCOSE",
            LabType::CholesterolTotal => "CHOLESTEROL_TOTAL",
            LabType::Ldl              => "LDL",
            LabType::Hdl              => "HDL",
            LabType::Triglycerides    => "TRIGLYCERIDES",
            LabType::BpSystolic       => "BP_SYSTOLIC",
            LabType::BpDiastolic      => "BP_DIASTOLIC",
            LabType::HeartRate        => "HEART_RATE",
            LabType::Creatinine       => "CREATININE",
            LabType::Hemoglobin       => "HEMOGLOBIN",
            LabType::Wbc              => "WBC",
            LabType::Platelets        => "PLATELETS",
            LabType::Other(name)      => name.as_str(),
        }
    }

    /// Parse the string used by the record normaliser. Matching is case-insensitive.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "A1C" | "HBA1C"              => LabType::A1c,
            "GLUCOSE"                    => LabType::Glucose,
            "CHOLESTEROL_TOTAL"          => LabType::CholesterolTotal,
            "LDL"                        => LabType::Ldl,
            "HDL"                        => LabType::Hdl,
            "TRIGLYCERIDES"              => LabType::Triglycerides,
            "BP_SYSTOLIC"                => LabType::BpSystolic,
            "BP_DIASTOLIC"               => LabType::BpDiastolic,
            "HEART_RATE"                 => LabType::HeartRate,
            "CREATININE"                 => LabType::Creatinine,
            "HEMOGLOBIN"                 => LabType::Hemoglobin,
            "WBC"                        => LabType::Wbc,
            "PLATELETS"                  => LabType::Platelets,
            _                            => LabType::Other(s.trim().to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, LabType::Other(_))
    }
}

impl From<String> for LabType {
    fn from(s: String) -> Self {
        LabType::parse(&s)
    }
}

impl From<LabType> for String {
    fn from(t: LabType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for LabType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lab measurement. Reference bounds are optional; scorers apply defaults
/// without mutating the observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabObservation {
    pub lab_type: LabType,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub reference_low: Option<f64>,
    #[serde(default)]
    pub reference_high: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

impl LabObservation {
    pub fn new(lab_type: LabType, value: f64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            lab_type,
            value,
            unit: String::new(),
            reference_low: None,
            reference_high: None,
            recorded_at,
        }
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    pub fn with_reference(mut self, low: Option<f64>, high: Option<f64>) -> Self {
        self.reference_low = low;
        self.reference_high = high;
        self
    }

    /// Lab values are concentrations, pressures or counts: never negative.
    pub fn validate(&self, domain: Domain) -> Result<()> {
        if !self.value.is_finite() {
            return Err(MedifuseError::malformed(
                domain,
                format!("{} value is not a finite number", self.lab_type),
            ));
        }
        if self.value < 0.0 {
            return Err(MedifuseError::malformed(
                domain,
                format!("{} value {} is negative", self.lab_type, self.value),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Imaging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImagingModality {
    #[serde(alias = "X-RAY", alias = "X_RAY")]
    Xray,
    Ct,
    Mri,
    Mammogram,
}

impl ImagingModality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImagingModality::Xray      => "XRAY",
            ImagingModality::Ct        => "CT",
            ImagingModality::Mri       => "MRI",
            ImagingModality::Mammogram => "MAMMOGRAM",
        }
    }
}

impl fmt::Display for ImagingModality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One imaging study. Only the most recent study is scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagingRecord {
    pub modality: ImagingModality,
    #[serde(default)]
    pub body_part: String,
    /// Upstream abnormality estimate in [0, 1]; absent means 0.2.
    #[serde(default)]
    pub abnormality_score: Option<f64>,
    #[serde(default)]
    pub study_date: Option<DateTime<Utc>>,
}

impl ImagingRecord {
    pub fn new(modality: ImagingModality, body_part: &str, abnormality_score: Option<f64>) -> Self {
        Self {
            modality,
            body_part: body_part.to_string(),
            abnormality_score,
            study_date: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(score) = self.abnormality_score {
            if !score.is_finite() || !(0.0..=1.0).contains(&score) {
                return Err(MedifuseError::malformed(
                    Domain::Imaging,
                    format!("abnormality_score {score} outside [0, 1]"),
                ));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Genomics
// ---------------------------------------------------------------------------

/// ACMG five-tier pathogenicity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcmgClassification {
    Pathogenic,
    LikelyPathogenic,
    #[serde(alias = "VOUS", alias = "UNCERTAIN_SIGNIFICANCE")]
    Vus,
    LikelyBenign,
    Benign,
}

impl AcmgClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcmgClassification::Pathogenic       => "PATHOGENIC",
            AcmgClassification::LikelyPathogenic => "LIKELY_PATHOGENIC",
            AcmgClassification::Vus              => "VUS",
            AcmgClassification::LikelyBenign     => "LIKELY_BENIGN",
            AcmgClassification::Benign           => "BENIGN",
        }
    }
}

impl fmt::Display for AcmgClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomicVariant {
    pub gene: String,
    /// Locus or HGVS notation, e.g. `17:43044295A>G`.
    #[serde(default)]
    pub variant: Option<String>,
    pub classification: AcmgClassification,
    #[serde(default)]
    pub pathogenicity_score: Option<f64>,
    #[serde(default)]
    pub associated_conditions: BTreeSet<String>,
}

impl GenomicVariant {
    pub fn new(gene: &str, classification: AcmgClassification) -> Self {
        Self {
            gene: gene.to_string(),
            variant: None,
            classification,
            pathogenicity_score: None,
            associated_conditions: BTreeSet::new(),
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.pathogenicity_score = Some(score);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.gene.trim().is_empty() {
            return Err(MedifuseError::malformed(Domain::Genomics, "variant with empty gene symbol"));
        }
        if let Some(score) = self.pathogenicity_score {
            if !score.is_finite() || !(0.0..=1.0).contains(&score) {
                return Err(MedifuseError::malformed(
                    Domain::Genomics,
                    format!("{} pathogenicity_score {score} outside [0, 1]", self.gene),
                ));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Clinical note signals
// ---------------------------------------------------------------------------

/// Structured signal already extracted from free-text notes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicalNoteSignal {
    #[serde(default)]
    pub conditions: BTreeSet<String>,
    #[serde(default)]
    pub medications: BTreeSet<String>,
    #[serde(default)]
    pub symptoms: BTreeSet<String>,
    /// In [-1, 1]; negative means the note reads as deteriorating.
    #[serde(default)]
    pub sentiment_score: f64,
    #[serde(default)]
    pub noted_at: Option<DateTime<Utc>>,
}

impl ClinicalNoteSignal {
    pub fn validate(&self) -> Result<()> {
        if !self.sentiment_score.is_finite() || !(-1.0..=1.0).contains(&self.sentiment_score) {
            return Err(MedifuseError::malformed(
                Domain::ClinicalNotes,
                format!("sentiment_score {} outside [-1, 1]", self.sentiment_score),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Patient bundle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    #[serde(alias = "M", alias = "male", alias = "Male")]
    Male,
    #[serde(alias = "F", alias = "female", alias = "Female")]
    Female,
    #[serde(other)]
    Other,
}

/// Input modality families. Serialises as the strings reported in `modalities_used`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataModality {
    Labs,
    Imaging,
    ClinicalNotes,
    Genomics,
}

impl DataModality {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataModality::Labs          => "labs",
            DataModality::Imaging       => "imaging",
            DataModality::ClinicalNotes => "clinical_notes",
            DataModality::Genomics      => "genomics",
        }
    }
}

/// Everything known about one patient at assessment time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientBundle {
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub bmi: Option<f64>,
    #[serde(default)]
    pub family_history_diabetes: bool,
    #[serde(default)]
    pub has_hypertension: bool,
    #[serde(default)]
    pub is_smoker: bool,
    #[serde(default)]
    pub has_diabetes: bool,
    #[serde(default)]
    pub labs: Vec<LabObservation>,
    #[serde(default)]
    pub imaging: Vec<ImagingRecord>,
    #[serde(default)]
    pub genomics: Vec<GenomicVariant>,
    #[serde(default)]
    pub clinical_notes: Vec<ClinicalNoteSignal>,
}

impl PatientBundle {
    pub fn has_modality(&self, modality: DataModality) -> bool {
        match modality {
            DataModality::Labs          => !self.labs.is_empty(),
            DataModality::Imaging       => !self.imaging.is_empty(),
            DataModality::ClinicalNotes => !self.clinical_notes.is_empty(),
            DataModality::Genomics      => !self.genomics.is_empty(),
        }
    }

    /// Observations of one type in chronological order.
    pub fn lab_series(&self, lab_type: &LabType) -> Vec<&LabObservation> {
        let mut series: Vec<&LabObservation> = self
            .labs
            .iter()
            .filter(|l| &l.lab_type == lab_type)
            .collect();
        series.sort_by_key(|l| l.recorded_at);
        series
    }

    pub fn latest_lab(&self, lab_type: &LabType) -> Option<&LabObservation> {
        self.lab_series(lab_type).last().copied()
    }

    /// Most recent imaging study: latest `study_date`, falling back to list order.
    pub fn latest_imaging(&self) -> Option<&ImagingRecord> {
        latest_by(&self.imaging, |r| r.study_date)
    }

    /// Most recent note signal: latest `noted_at`, falling back to list order.
    pub fn latest_note(&self) -> Option<&ClinicalNoteSignal> {
        latest_by(&self.clinical_notes, |n| n.noted_at)
    }
}

// Undated entries rank below dated ones; ties resolve to the later list position.
fn latest_by<T, F>(items: &[T], date: F) -> Option<&T>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    items
        .iter()
        .enumerate()
        .max_by_key(|(idx, item)| (date(item), *idx))
        .map(|(_, item)| item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_lab_type_parse_is_case_insensitive() {
        assert_eq!(LabType::parse("a1c"), LabType::A1c);
        assert_eq!(LabType::parse("bp_systolic"), LabType::BpSystolic);
        assert_eq!(LabType::parse("FERRITIN"), LabType::Other("FERRITIN".to_string()));
    }

    #[test]
    fn test_unknown_lab_type_keeps_original_string() {
        let json = r#"{"lab_type":"Ferritin","value":80.0,"recorded_at":"2024-01-01T00:00:00Z"}"#;
        let obs: LabObservation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.lab_type.as_str(), "Ferritin");
        let back = serde_json::to_value(&obs).unwrap();
        assert_eq!(back["lab_type"], "Ferritin");
    }

    #[test]
    fn test_latest_lab_uses_timestamp_not_list_order() {
        let bundle = PatientBundle {
            labs: vec![
                LabObservation::new(LabType::A1c, 7.1, at(20)),
                LabObservation::new(LabType::A1c, 5.4, at(2)),
            ],
            ..Default::default()
        };
        assert_eq!(bundle.latest_lab(&LabType::A1c).unwrap().value, 7.1);
        let series: Vec<f64> = bundle.lab_series(&LabType::A1c).iter().map(|l| l.value).collect();
        assert_eq!(series, vec![5.4, 7.1]);
    }

    #[test]
    fn test_latest_imaging_falls_back_to_list_order() {
        let bundle = PatientBundle {
            imaging: vec![
                ImagingRecord::new(ImagingModality::Xray, "CHEST", Some(0.1)),
                ImagingRecord::new(ImagingModality::Ct, "CHEST", Some(0.4)),
            ],
            ..Default::default()
        };
        assert_eq!(bundle.latest_imaging().unwrap().modality, ImagingModality::Ct);
    }

    #[test]
    fn test_dated_imaging_wins_over_undated() {
        let mut dated = ImagingRecord::new(ImagingModality::Mri, "BRAIN", None);
        dated.study_date = Some(at(5));
        let bundle = PatientBundle {
            imaging: vec![dated, ImagingRecord::new(ImagingModality::Ct, "CHEST", None)],
            ..Default::default()
        };
        assert_eq!(bundle.latest_imaging().unwrap().modality, ImagingModality::Mri);
    }

    #[test]
    fn test_negative_lab_value_is_malformed() {
        let obs = LabObservation::new(LabType::Ldl, -4.0, at(1));
        assert!(obs.validate(Domain::Cardiovascular).is_err());
    }

    #[test]
    fn test_gender_aliases() {
        let g: Gender = serde_json::from_str("\"M\"").unwrap();
        assert_eq!(g, Gender::Male);
        let g: Gender = serde_json::from_str("\"female\"").unwrap();
        assert_eq!(g, Gender::Female);
        let g: Gender = serde_json::from_str("\"nonbinary\"").unwrap();
        assert_eq!(g, Gender::Other);
    }
}
