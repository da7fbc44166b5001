//! Fixtures and builders shared by the Medifuse test suites.

use chrono::{DateTime, Duration, TimeZone, Utc};
use medifuse_common::{
    AcmgClassification, ClinicalNoteSignal, Gender, GenomicVariant, ImagingModality,
    ImagingRecord, LabObservation, LabType, PatientBundle,
};

/// Fixed origin so fixtures never depend on the wall clock.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).single().unwrap_or_default()
}

/// `days` after the fixture epoch.
pub fn day(days: i64) -> DateTime<Utc> {
    epoch() + Duration::days(days)
}

pub fn lab(lab_type: LabType, value: f64, on_day: i64) -> LabObservation {
    LabObservation::new(lab_type, value, day(on_day))
}

/// One observation per value, 30 days apart.
pub fn lab_series(lab_type: LabType, values: &[f64]) -> Vec<LabObservation> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| lab(lab_type.clone(), *v, i as i64 * 30))
        .collect()
}

pub fn note(conditions: &[&str], medications: &[&str], symptoms: &[&str], sentiment: f64) -> ClinicalNoteSignal {
    ClinicalNoteSignal {
        conditions: conditions.iter().map(|s| s.to_string()).collect(),
        medications: medications.iter().map(|s| s.to_string()).collect(),
        symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        sentiment_score: sentiment,
        noted_at: None,
    }
}

/// Fluent builder for [`PatientBundle`].
#[derive(Debug, Default, Clone)]
pub struct BundleBuilder {
    bundle: PatientBundle,
}

impl BundleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn age(mut self, age: f64) -> Self {
        self.bundle.age = Some(age);
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.bundle.gender = Some(gender);
        self
    }

    pub fn bmi(mut self, bmi: f64) -> Self {
        self.bundle.bmi = Some(bmi);
        self
    }

    pub fn smoker(mut self) -> Self {
        self.bundle.is_smoker = true;
        self
    }

    pub fn diabetic(mut self) -> Self {
        self.bundle.has_diabetes = true;
        self
    }

    pub fn hypertensive(mut self) -> Self {
        self.bundle.has_hypertension = true;
        self
    }

    pub fn family_history_diabetes(mut self) -> Self {
        self.bundle.family_history_diabetes = true;
        self
    }

    pub fn lab(mut self, lab_type: LabType, value: f64, on_day: i64) -> Self {
        self.bundle.labs.push(lab(lab_type, value, on_day));
        self
    }

    pub fn series(mut self, lab_type: LabType, values: &[f64]) -> Self {
        self.bundle.labs.extend(lab_series(lab_type, values));
        self
    }

    pub fn imaging(mut self, modality: ImagingModality, body_part: &str, score: f64) -> Self {
        self.bundle.imaging.push(ImagingRecord::new(modality, body_part, Some(score)));
        self
    }

    pub fn variant(mut self, gene: &str, classification: AcmgClassification) -> Self {
        self.bundle.genomics.push(GenomicVariant::new(gene, classification));
        self
    }

    pub fn note(mut self, signal: ClinicalNoteSignal) -> Self {
        self.bundle.clinical_notes.push(signal);
        self
    }

    pub fn build(self) -> PatientBundle {
        self.bundle
    }
}

/// A patient with a standard lipid/metabolic panel and nothing else.
pub fn labs_only_bundle() -> PatientBundle {
    BundleBuilder::new()
        .age(52.0)
        .gender(Gender::Female)
        .bmi(27.5)
        .series(LabType::A1c, &[5.6, 5.9, 6.1])
        .lab(LabType::Glucose, 108.0, 60)
        .lab(LabType::Ldl, 142.0, 60)
        .lab(LabType::Hdl, 48.0, 60)
        .lab(LabType::CholesterolTotal, 221.0, 60)
        .lab(LabType::Triglycerides, 165.0, 60)
        .lab(LabType::BpSystolic, 134.0, 60)
        .lab(LabType::BpDiastolic, 86.0, 60)
        .build()
}

/// A patient with every modality present.
pub fn full_bundle() -> PatientBundle {
    let mut bundle = labs_only_bundle();
    bundle.imaging.push(ImagingRecord::new(ImagingModality::Ct, "CHEST", Some(0.45)));
    bundle.genomics.push(GenomicVariant::new("BRCA1", AcmgClassification::Pathogenic).with_score(0.92));
    bundle.genomics.push(GenomicVariant::new("ATM", AcmgClassification::Vus));
    bundle.clinical_notes.push(note(
        &["Type 2 diabetes", "Hypertension"],
        &["metformin", "lisinopril"],
        &["fatigue"],
        -0.1,
    ));
    bundle
}

/// Serialise a bundle the way the CLI reads it.
pub fn bundle_json(bundle: &PatientBundle) -> String {
    serde_json::to_string_pretty(bundle).unwrap_or_default()
}
