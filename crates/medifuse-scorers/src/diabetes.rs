//! Diabetes risk from A1C, fasting glucose and metabolic risk factors.

use std::collections::{BTreeMap, BTreeSet};

use medifuse_common::assessment::{
    A1cTrend, DiabetesClassification, DiabetesDetails, DomainDetails, MODEL_VERSION,
};
use medifuse_common::util::round3;
use medifuse_common::{
    DataModality, Domain, Factor, Impact, LabType, PatientBundle, PredictionType, Result,
    RiskAssessment, RiskLevel, TrendDirection,
};
use serde::{Deserialize, Serialize};

use crate::extract::{demographic, lab_values, latest_lab_value};
use crate::normalise::{display_value, excess_of};
use crate::scorer::{FromBundle, Scorer};

// Missing values are replaced by clinically normal midpoints for reporting
// and classification. They never trigger a modifier on their own.
pub const DEFAULT_A1C: f64 = 5.5;
pub const DEFAULT_GLUCOSE: f64 = 90.0;
pub const DEFAULT_BMI: f64 = 25.0;

const A1C_NORMAL_BELOW: f64 = 5.6;
const A1C_DIABETIC_FROM: f64 = 6.5;
const A1C_REPORT_FROM: f64 = 5.7;
const GLUCOSE_NORMAL_MAX: f64 = 100.0;
const GLUCOSE_PREDIABETIC_MAX: f64 = 125.0;

const SCORE_CAP: f64 = 0.95;
const CONFIDENCE: f64 = 0.85;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiabetesInput {
    /// A1C values in chronological order; the last one is current.
    #[serde(default)]
    pub a1c_history: Vec<f64>,
    #[serde(default)]
    pub glucose: Option<f64>,
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub bmi: Option<f64>,
    #[serde(default)]
    pub family_history: bool,
    #[serde(default)]
    pub hypertension: bool,
}

impl FromBundle for DiabetesInput {
    fn from_bundle(bundle: &PatientBundle) -> Result<Self> {
        let domain = Domain::Diabetes;
        Ok(Self {
            a1c_history: lab_values(bundle, &LabType::A1c, domain)?,
            glucose: latest_lab_value(bundle, &LabType::Glucose, domain)?,
            age: demographic(bundle.age, "age", domain)?,
            bmi: demographic(bundle.bmi, "bmi", domain)?,
            family_history: bundle.family_history_diabetes,
            hypertension: bundle.has_hypertension,
        })
    }
}

/// Base classification and risk from A1C alone.
pub fn classify_a1c(a1c: f64) -> (DiabetesClassification, f64) {
    if a1c < A1C_NORMAL_BELOW {
        (DiabetesClassification::Normal, 0.1)
    } else if a1c < A1C_DIABETIC_FROM {
        (DiabetesClassification::PreDiabetic, 0.5)
    } else {
        (DiabetesClassification::Diabetic, 0.9)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiabetesScorer;

impl Scorer for DiabetesScorer {
    type Input = DiabetesInput;

    const DOMAIN: Domain = Domain::Diabetes;

    fn score(&self, input: &DiabetesInput) -> RiskAssessment {
        let a1c = input.a1c_history.last().copied().unwrap_or(DEFAULT_A1C);
        let glucose = input.glucose.unwrap_or(DEFAULT_GLUCOSE);
        let bmi = input.bmi.unwrap_or(DEFAULT_BMI);

        let (classification, base_risk) = classify_a1c(a1c);
        let mut modifiers = 0.0;
        let mut factors = Vec::new();

        if a1c >= A1C_REPORT_FROM {
            factors.push(Factor::new(
                "A1C Level",
                format!("{}%", display_value(a1c)),
                if a1c >= A1C_DIABETIC_FROM { Impact::High } else { Impact::Moderate },
                "Elevated A1C indicates poor blood sugar control",
            ));
        }

        if glucose > GLUCOSE_NORMAL_MAX {
            modifiers += if glucose <= GLUCOSE_PREDIABETIC_MAX { 0.1 } else { 0.2 };
            factors.push(Factor::new(
                "Fasting Glucose",
                format!("{} mg/dL", display_value(glucose)),
                Impact::Moderate,
                "Elevated fasting glucose suggests insulin resistance",
            ));
        }

        modifiers += excess_of(input.age, 45.0, 0.005, 0.15);
        if let Some(age) = input.age.filter(|a| *a > 60.0) {
            factors.push(Factor::new(
                "Age",
                format!("{} years", display_value(age)),
                Impact::Moderate,
                "Age over 60 increases diabetes risk",
            ));
        }

        modifiers += excess_of(input.bmi, 25.0, 0.02, 0.2);
        if bmi > 30.0 {
            factors.push(Factor::new(
                "BMI",
                format!("{bmi:.1}"),
                if bmi > 35.0 { Impact::High } else { Impact::Moderate },
                "Obesity significantly increases diabetes risk",
            ));
        }

        if input.family_history {
            modifiers += 0.15;
            factors.push(Factor::new(
                "Family History",
                "Present",
                Impact::Moderate,
                "Family history of diabetes increases genetic risk",
            ));
        }

        if input.hypertension {
            modifiers += 0.1;
            factors.push(Factor::new(
                "Hypertension",
                "Present",
                Impact::Low,
                "High blood pressure often co-occurs with diabetes",
            ));
        }

        let risk_score = round3((base_risk + modifiers).min(SCORE_CAP));
        let risk_level = RiskLevel::bucket(risk_score, 0.2, 0.5, 0.75);

        let mut recommendations = Vec::new();
        if risk_level >= RiskLevel::High {
            recommendations.extend([
                "Schedule appointment with endocrinologist".to_string(),
                "Consider medication review with physician".to_string(),
                "Increase frequency of glucose monitoring".to_string(),
            ]);
        }
        if bmi > 25.0 {
            recommendations.push("Weight management program recommended".to_string());
        }
        if a1c > A1C_NORMAL_BELOW {
            recommendations.push("Dietary modifications to reduce carbohydrate intake".to_string());
        }
        if !input.family_history {
            recommendations.push("Regular exercise (150 min/week moderate intensity)".to_string());
        }

        RiskAssessment {
            prediction_type: PredictionType::DiabetesRisk,
            risk_score,
            risk_level,
            confidence: CONFIDENCE,
            contributing_factors: factors,
            recommendations,
            modalities_used: BTreeSet::from([DataModality::Labs]),
            details: DomainDetails::Diabetes(DiabetesDetails {
                classification,
                trend: a1c_trend(&input.a1c_history),
                a1c,
                glucose,
                thresholds: thresholds(),
            }),
            model_version: MODEL_VERSION.to_string(),
        }
    }
}

/// First-versus-last comparison; not a regression.
fn a1c_trend(history: &[f64]) -> Option<A1cTrend> {
    match (history.first(), history.last()) {
        (Some(first), Some(last)) if history.len() >= 2 => Some(A1cTrend {
            direction: TrendDirection::from_endpoints(*first, *last),
            change: round3(last - first),
            period: format!("{} measurements", history.len()),
        }),
        _ => None,
    }
}

fn thresholds() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("a1c_normal".to_string(), format!("< {A1C_NORMAL_BELOW}%")),
        ("a1c_prediabetic".to_string(), format!("{A1C_NORMAL_BELOW}% - 6.4%")),
        ("a1c_diabetic".to_string(), format!("≥ {A1C_DIABETIC_FROM}%")),
    ])
}
