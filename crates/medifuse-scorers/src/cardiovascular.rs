//! Cardiovascular risk from the lipid panel, blood pressure and lifestyle flags.
//! Additive Framingham-style contributions, each capped independently.

use std::collections::{BTreeMap, BTreeSet};

use medifuse_common::assessment::{CardiovascularDetails, DomainDetails, MODEL_VERSION};
use medifuse_common::util::{round3, round_to};
use medifuse_common::{
    DataModality, Domain, Factor, Gender, Impact, LabType, PatientBundle, PredictionType, Result,
    RiskAssessment, RiskLevel,
};
use serde::{Deserialize, Serialize};

use crate::extract::{demographic, latest_lab_value};
use crate::normalise::{capped_deficit, capped_excess, display_value};
use crate::scorer::{FromBundle, Scorer};

pub const DEFAULT_LDL: f64 = 100.0;
pub const DEFAULT_HDL: f64 = 50.0;
pub const DEFAULT_TOTAL_CHOLESTEROL: f64 = 180.0;
pub const DEFAULT_TRIGLYCERIDES: f64 = 120.0;
pub const DEFAULT_BP_SYSTOLIC: f64 = 120.0;
pub const DEFAULT_BP_DIASTOLIC: f64 = 80.0;
pub const DEFAULT_AGE: f64 = 50.0;

const LDL_OPTIMAL: f64 = 100.0;
const LDL_HIGH: f64 = 160.0;
const HDL_LOW: f64 = 40.0;
const HDL_OPTIMAL: f64 = 60.0;
const TRIG_HIGH: f64 = 150.0;
const BP_SYS_NORMAL: f64 = 120.0;
const BP_SYS_HIGH: f64 = 140.0;
const BP_DIA_NORMAL: f64 = 80.0;
const AGE_BASELINE: f64 = 40.0;
const AGE_REPORT_FROM: f64 = 55.0;

const SCORE_CAP: f64 = 0.95;
const CONFIDENCE: f64 = 0.82;

/// Latest panel values. `None` means not measured and is scored as the
/// matching `DEFAULT_*` constant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardiovascularInput {
    #[serde(default)]
    pub ldl: Option<f64>,
    #[serde(default)]
    pub hdl: Option<f64>,
    #[serde(default)]
    pub total_cholesterol: Option<f64>,
    #[serde(default)]
    pub triglycerides: Option<f64>,
    #[serde(default)]
    pub bp_systolic: Option<f64>,
    #[serde(default)]
    pub bp_diastolic: Option<f64>,
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub is_smoker: bool,
    #[serde(default)]
    pub has_diabetes: bool,
}

impl FromBundle for CardiovascularInput {
    fn from_bundle(bundle: &PatientBundle) -> Result<Self> {
        let domain = Domain::Cardiovascular;
        let latest = |t: LabType| latest_lab_value(bundle, &t, domain);
        Ok(Self {
            ldl: latest(LabType::Ldl)?,
            hdl: latest(LabType::Hdl)?,
            total_cholesterol: latest(LabType::CholesterolTotal)?,
            triglycerides: latest(LabType::Triglycerides)?,
            bp_systolic: latest(LabType::BpSystolic)?,
            bp_diastolic: latest(LabType::BpDiastolic)?,
            age: demographic(bundle.age, "age", domain)?,
            gender: bundle.gender,
            is_smoker: bundle.is_smoker,
            has_diabetes: bundle.has_diabetes,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CardiovascularScorer;

impl Scorer for CardiovascularScorer {
    type Input = CardiovascularInput;

    const DOMAIN: Domain = Domain::Cardiovascular;

    fn score(&self, input: &CardiovascularInput) -> RiskAssessment {
        let ldl = input.ldl.unwrap_or(DEFAULT_LDL);
        let hdl = input.hdl.unwrap_or(DEFAULT_HDL);
        let total = input.total_cholesterol.unwrap_or(DEFAULT_TOTAL_CHOLESTEROL);
        let triglycerides = input.triglycerides.unwrap_or(DEFAULT_TRIGLYCERIDES);
        let systolic = input.bp_systolic.unwrap_or(DEFAULT_BP_SYSTOLIC);
        let diastolic = input.bp_diastolic.unwrap_or(DEFAULT_BP_DIASTOLIC);
        let age = input.age.unwrap_or(DEFAULT_AGE);

        let mut risk = 0.0;
        let mut factors = Vec::new();

        let ldl_risk = capped_excess(ldl, LDL_OPTIMAL, 1.0 / 200.0, 0.25);
        if ldl_risk > 0.0 {
            risk += ldl_risk;
            factors.push(Factor::new(
                "LDL Cholesterol",
                format!("{} mg/dL", display_value(ldl)),
                if ldl > LDL_HIGH { Impact::High } else { Impact::Moderate },
                "Elevated LDL (\"bad\" cholesterol) increases plaque buildup",
            ));
        }

        risk += capped_deficit(hdl, HDL_OPTIMAL, 1.0 / 100.0, 0.15);
        if hdl < HDL_LOW {
            factors.push(Factor::new(
                "HDL Cholesterol",
                format!("{} mg/dL", display_value(hdl)),
                Impact::Moderate,
                "Low HDL (\"good\" cholesterol) reduces protection",
            ));
        }

        let trig_risk = capped_excess(triglycerides, TRIG_HIGH, 1.0 / 500.0, 0.10);
        if trig_risk > 0.0 {
            risk += trig_risk;
            factors.push(Factor::new(
                "Triglycerides",
                format!("{} mg/dL", display_value(triglycerides)),
                Impact::Moderate,
                "Elevated triglycerides contribute to arterial disease",
            ));
        }

        let bp_risk = capped_excess(systolic, BP_SYS_NORMAL, 1.0 / 100.0, 0.20);
        if bp_risk > 0.0 {
            risk += bp_risk;
            factors.push(Factor::new(
                "Blood Pressure",
                format!("{}/{} mmHg", display_value(systolic), display_value(diastolic)),
                if systolic > BP_SYS_HIGH { Impact::High } else { Impact::Moderate },
                "Hypertension strains the heart and blood vessels",
            ));
        }

        risk += capped_excess(age, AGE_BASELINE, 0.005, 0.20);
        if age > AGE_REPORT_FROM {
            factors.push(Factor::new(
                "Age",
                format!("{} years", display_value(age)),
                Impact::Moderate,
                "Cardiovascular risk increases with age",
            ));
        }

        // Male baseline risk only applies when gender is known.
        if input.gender == Some(Gender::Male) {
            risk += 0.05;
        }

        if input.is_smoker {
            risk += 0.15;
            factors.push(Factor::new(
                "Smoking",
                "Active smoker",
                Impact::High,
                "Smoking significantly increases cardiovascular risk",
            ));
        }

        if input.has_diabetes {
            risk += 0.15;
            factors.push(Factor::new(
                "Diabetes",
                "Present",
                Impact::High,
                "Diabetes increases risk of heart disease",
            ));
        }

        let risk_score = round3(risk.min(SCORE_CAP));
        let risk_level = RiskLevel::bucket(risk_score, 0.1, 0.2, 0.4);

        let mut recommendations = Vec::new();
        if ldl_risk > 0.0 {
            recommendations.push("Consider statin therapy - discuss with physician".to_string());
        }
        if hdl < HDL_OPTIMAL {
            recommendations.push("Increase physical activity to raise HDL".to_string());
        }
        if bp_risk > 0.0 {
            recommendations.push("Monitor blood pressure regularly".to_string());
            recommendations.push("Reduce sodium intake".to_string());
        }
        if input.is_smoker {
            recommendations.push("Smoking cessation strongly recommended".to_string());
        }
        if trig_risk > 0.0 {
            recommendations.push("Reduce refined carbohydrates and alcohol".to_string());
        }
        recommendations.push("Mediterranean diet recommended for heart health".to_string());

        let cholesterol_ratio = if hdl > 0.0 { round_to(total / hdl, 2) } else { 0.0 };

        RiskAssessment {
            prediction_type: PredictionType::CardiovascularRisk,
            risk_score,
            risk_level,
            confidence: CONFIDENCE,
            contributing_factors: factors,
            recommendations,
            modalities_used: BTreeSet::from([DataModality::Labs]),
            details: DomainDetails::Cardiovascular(CardiovascularDetails {
                ten_year_risk_percent: round_to(risk_score * 100.0, 1),
                ldl,
                hdl,
                total_cholesterol: total,
                triglycerides,
                blood_pressure: format!("{}/{}", display_value(systolic), display_value(diastolic)),
                cholesterol_ratio,
                thresholds: thresholds(),
            }),
            model_version: MODEL_VERSION.to_string(),
        }
    }
}

fn thresholds() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("ldl_optimal".to_string(), format!("< {LDL_OPTIMAL} mg/dL")),
        ("hdl_optimal".to_string(), format!("> {HDL_OPTIMAL} mg/dL")),
        ("bp_normal".to_string(), format!("< {BP_SYS_NORMAL}/{BP_DIA_NORMAL} mmHg")),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_year(a: &RiskAssessment) -> f64 {
        match &a.details {
            DomainDetails::Cardiovascular(d) => d.ten_year_risk_percent,
            other => panic!("unexpected details {other:?}"),
        }
    }

    fn optimal_panel() -> CardiovascularInput {
        CardiovascularInput {
            ldl: Some(100.0),
            hdl: Some(60.0),
            bp_systolic: Some(120.0),
            bp_diastolic: Some(80.0),
            age: Some(40.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_optimal_panel_scores_zero() {
        let a = CardiovascularScorer.score(&optimal_panel());
        assert_eq!(a.risk_score, 0.0);
        assert_eq!(a.risk_level, RiskLevel::Low);
        assert!(a.contributing_factors.is_empty());
        assert_eq!(a.recommendations, vec!["Mediterranean diet recommended for heart health"]);
    }

    #[test]
    fn test_contributions_are_individually_capped() {
        let input = CardiovascularInput { ldl: Some(400.0), ..optimal_panel() };
        let a = CardiovascularScorer.score(&input);
        assert_eq!(a.risk_score, 0.25);
        assert_eq!(a.risk_level, RiskLevel::High);
        assert_eq!(a.contributing_factors[0].impact, Impact::High);
    }

    #[test]
    fn test_high_risk_profile() {
        let input = CardiovascularInput {
            ldl: Some(160.0),
            hdl: Some(35.0),
            triglycerides: Some(250.0),
            bp_systolic: Some(150.0),
            bp_diastolic: Some(95.0),
            age: Some(60.0),
            gender: Some(Gender::Male),
            is_smoker: true,
            has_diabetes: false,
            total_cholesterol: Some(240.0),
        };
        let a = CardiovascularScorer.score(&input);
        // 0.3 capped 0.25 + 0.15 + 0.1 capped 0.1 + 0.2 capped + 0.1 + 0.05 + 0.15
        assert_eq!(a.risk_score, 0.95);
        assert_eq!(a.risk_level, RiskLevel::Critical);
        assert_eq!(ten_year(&a), 95.0);
        assert!(a.recommendations.contains(&"Smoking cessation strongly recommended".to_string()));
        assert_eq!(
            a.recommendations.last().map(String::as_str),
            Some("Mediterranean diet recommended for heart health")
        );
    }

    #[test]
    fn test_missing_hdl_is_scored_as_default() {
        let input = CardiovascularInput { hdl: None, ..optimal_panel() };
        let a = CardiovascularScorer.score(&input);
        // (60 - 50) / 100
        assert_eq!(a.risk_score, 0.1);
        assert_eq!(a.risk_level, RiskLevel::Moderate);
        assert!(a.recommendations.contains(&"Increase physical activity to raise HDL".to_string()));
    }

    #[test]
    fn test_empty_panel_uses_defaults() {
        let a = CardiovascularScorer.score(&CardiovascularInput::default());
        // HDL deficit 0.10 + age (50 - 40) × 0.005
        assert_eq!(a.risk_score, 0.15);
        assert_eq!(a.risk_level, RiskLevel::Moderate);
        assert!(a.contributing_factors.is_empty());
        match &a.details {
            DomainDetails::Cardiovascular(d) => {
                assert_eq!(d.hdl, DEFAULT_HDL);
                assert_eq!(d.ldl, DEFAULT_LDL);
                assert_eq!(d.cholesterol_ratio, 3.6);
                assert_eq!(d.blood_pressure, "120/80");
                assert_eq!(d.ten_year_risk_percent, 15.0);
            }
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[test]
    fn test_missing_age_is_scored_as_fifty() {
        let input = CardiovascularInput { age: None, ..optimal_panel() };
        assert_eq!(CardiovascularScorer.score(&input).risk_score, 0.05);
    }

    #[test]
    fn test_male_and_smoker() {
        let input = CardiovascularInput {
            gender: Some(Gender::Male),
            is_smoker: true,
            ..optimal_panel()
        };
        let a = CardiovascularScorer.score(&input);
        assert_eq!(a.risk_score, 0.2);
        assert_eq!(a.risk_level, RiskLevel::High);
    }
}
