//! Scoring of structured signals extracted from clinical notes.

use std::collections::BTreeSet;

use medifuse_common::assessment::{
    ClinicalNoteDetails, ConditionAnalysis, ConditionSeverity, DomainDetails, HealthTrend,
    MODEL_VERSION,
};
use medifuse_common::util::round3;
use medifuse_common::{
    ClinicalNoteSignal, DataModality, Domain, Factor, Impact, MedifuseError, PatientBundle,
    PredictionType, Result, RiskAssessment, RiskLevel,
};
use medifuse_reference::condition_severity;

use crate::scorer::{FromBundle, Scorer};

const CONFIDENCE: f64 = 0.75;
const POLYPHARMACY_ABOVE: usize = 5;
const COMORBIDITY_ABOVE: usize = 3;

impl FromBundle for ClinicalNoteSignal {
    fn from_bundle(bundle: &PatientBundle) -> Result<Self> {
        let note = bundle
            .latest_note()
            .ok_or_else(|| MedifuseError::malformed(Domain::ClinicalNotes, "no note signal"))?;
        note.validate()?;
        Ok(note.clone())
    }
}

pub fn health_trend(sentiment: f64) -> HealthTrend {
    if sentiment > 0.3 {
        HealthTrend::Improving
    } else if sentiment < -0.3 {
        HealthTrend::Declining
    } else {
        HealthTrend::Stable
    }
}

/// min(1, 0.2 per condition + 0.1 per medication + 0.15 per symptom).
pub fn complexity_score(conditions: usize, medications: usize, symptoms: usize) -> f64 {
    (conditions as f64 * 0.2 + medications as f64 * 0.1 + symptoms as f64 * 0.15).min(1.0)
}

fn risk_level_for(severity: ConditionSeverity) -> RiskLevel {
    match severity {
        ConditionSeverity::Low                                => RiskLevel::Low,
        ConditionSeverity::Moderate | ConditionSeverity::Chronic => RiskLevel::Moderate,
        ConditionSeverity::High                               => RiskLevel::High,
        ConditionSeverity::Critical                           => RiskLevel::Critical,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClinicalNoteScorer;

impl Scorer for ClinicalNoteScorer {
    type Input = ClinicalNoteSignal;

    const DOMAIN: Domain = Domain::ClinicalNotes;

    fn score(&self, note: &ClinicalNoteSignal) -> RiskAssessment {
        let analysis: Vec<ConditionAnalysis> = note
            .conditions
            .iter()
            .map(|c| ConditionAnalysis {
                condition: c.clone(),
                severity: condition_severity(c),
                status: "ACTIVE".to_string(),
            })
            .collect();

        let highest = analysis
            .iter()
            .map(|a| a.severity)
            .max()
            .unwrap_or(ConditionSeverity::Low);

        let sentiment = if note.sentiment_score.is_finite() { note.sentiment_score } else { 0.0 };
        let trend = health_trend(sentiment);
        let complexity = round3(complexity_score(
            note.conditions.len(),
            note.medications.len(),
            note.symptoms.len(),
        ));
        let has_cancer = note.conditions.iter().any(|c| c.to_lowercase().contains("cancer"));

        let mut insights = Vec::new();
        if note.medications.len() > POLYPHARMACY_ABOVE {
            insights.push("Complex medication regimen - polypharmacy review recommended".to_string());
        }
        if note.conditions.len() > COMORBIDITY_ABOVE {
            insights.push("Multiple comorbidities present - coordinated care advised".to_string());
        }
        if has_cancer {
            insights.push("Oncology monitoring in progress".to_string());
        }
        if trend == HealthTrend::Declining {
            insights.push("Trend indicates potential decline - closer monitoring advised".to_string());
        }

        let mut factors: Vec<Factor> = analysis
            .iter()
            .filter(|a| a.severity >= ConditionSeverity::Chronic)
            .map(|a| {
                let impact = if a.severity >= ConditionSeverity::High { Impact::High } else { Impact::Moderate };
                Factor::new(
                    "Documented Condition",
                    a.condition.clone(),
                    impact,
                    &format!("{} severity condition noted in clinical documentation", a.severity.as_str()),
                )
            })
            .collect();
        if note.medications.len() > POLYPHARMACY_ABOVE {
            factors.push(Factor::new(
                "Medication Count",
                format!("{} medications", note.medications.len()),
                Impact::Moderate,
                "Polypharmacy raises the risk of adverse interactions",
            ));
        }

        let mut recommendations = Vec::new();
        if !note.medications.is_empty() {
            recommendations.push("Medication reconciliation recommended".to_string());
        }
        if !note.symptoms.is_empty() {
            recommendations.push("Address reported symptoms at next visit".to_string());
        }
        if trend == HealthTrend::Declining {
            recommendations.push("Consider care plan review".to_string());
        }

        RiskAssessment {
            prediction_type: PredictionType::ClinicalNlpAnalysis,
            risk_score: complexity,
            risk_level: risk_level_for(highest),
            confidence: CONFIDENCE,
            contributing_factors: factors,
            recommendations,
            modalities_used: BTreeSet::from([DataModality::ClinicalNotes]),
            details: DomainDetails::ClinicalNotes(ClinicalNoteDetails {
                condition_analysis: analysis,
                highest_severity: highest,
                conditions_count: note.conditions.len(),
                medications_count: note.medications.len(),
                symptoms_count: note.symptoms.len(),
                health_trend: trend,
                sentiment_score: sentiment,
                complexity_score: complexity,
                insights,
            }),
            model_version: MODEL_VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(conditions: &[&str], medications: &[&str], symptoms: &[&str], sentiment: f64) -> ClinicalNoteSignal {
        ClinicalNoteSignal {
            conditions: conditions.iter().map(|s| s.to_string()).collect(),
            medications: medications.iter().map(|s| s.to_string()).collect(),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            sentiment_score: sentiment,
            noted_at: None,
        }
    }

    fn details(a: &RiskAssessment) -> &ClinicalNoteDetails {
        match &a.details {
            DomainDetails::ClinicalNotes(d) => d,
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[test]
    fn test_empty_note_is_low() {
        let a = ClinicalNoteScorer.score(&ClinicalNoteSignal::default());
        assert_eq!(a.risk_score, 0.0);
        assert_eq!(a.risk_level, RiskLevel::Low);
        assert_eq!(details(&a).health_trend, HealthTrend::Stable);
        assert!(a.recommendations.is_empty());
    }

    #[test]
    fn test_highest_severity_drives_level() {
        let a = ClinicalNoteScorer.score(&note(&["Type 2 diabetes", "Lung cancer"], &[], &[], 0.0));
        assert_eq!(details(&a).highest_severity, ConditionSeverity::Critical);
        assert_eq!(a.risk_level, RiskLevel::Critical);
        assert!(details(&a).insights.contains(&"Oncology monitoring in progress".to_string()));
    }

    #[test]
    fn test_chronic_maps_to_moderate_level() {
        let a = ClinicalNoteScorer.score(&note(&["Asthma"], &[], &[], 0.0));
        assert_eq!(details(&a).highest_severity, ConditionSeverity::Chronic);
        assert_eq!(a.risk_level, RiskLevel::Moderate);
    }

    #[test]
    fn test_complexity_score() {
        let a = ClinicalNoteScorer.score(&note(&["a", "b"], &["m1", "m2", "m3"], &["s1"], 0.0));
        assert_eq!(a.risk_score, 0.85);
        assert_eq!(complexity_score(10, 10, 10), 1.0);
    }

    #[test]
    fn test_declining_trend_adds_insight_and_review() {
        let a = ClinicalNoteScorer.score(&note(&[], &["metformin"], &["fatigue"], -0.6));
        assert_eq!(details(&a).health_trend, HealthTrend::Declining);
        assert_eq!(
            a.recommendations,
            vec![
                "Medication reconciliation recommended",
                "Address reported symptoms at next visit",
                "Consider care plan review",
            ]
        );
    }

    #[test]
    fn test_polypharmacy_and_comorbidity() {
        let meds = ["a", "b", "c", "d", "e", "f"];
        let conds = ["obesity", "depression", "arthritis", "copd"];
        let a = ClinicalNoteScorer.score(&note(&conds, &meds, &[], 0.5));
        let d = details(&a);
        assert_eq!(d.health_trend, HealthTrend::Improving);
        assert_eq!(d.insights.len(), 2);
        assert!(a.contributing_factors.iter().any(|f| f.name == "Medication Count"));
    }
}
