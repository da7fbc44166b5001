//! Per-lab-type value bands.
//!
//! Each lab type keeps its own boundary convention (`<` vs `<=`); they follow
//! the clinical guideline each band comes from and are not unified.

use medifuse_common::{Gender, LabObservation, LabType};
use medifuse_reference::reference_range;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueStatus {
    Normal,
    Optimal,
    NearOptimal,
    Desirable,
    Low,
    High,
    Elevated,
    BorderlineHigh,
    VeryHigh,
    PreDiabetic,
    Impaired,
    Diabetic,
    Stage1Hypertension,
    Stage2Hypertension,
    HypertensiveCrisis,
}

impl ValueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueStatus::Normal             => "NORMAL",
            ValueStatus::Optimal            => "OPTIMAL",
            ValueStatus::NearOptimal        => "NEAR_OPTIMAL",
            ValueStatus::Desirable          => "DESIRABLE",
            ValueStatus::Low                => "LOW",
            ValueStatus::High               => "HIGH",
            ValueStatus::Elevated           => "ELEVATED",
            ValueStatus::BorderlineHigh     => "BORDERLINE_HIGH",
            ValueStatus::VeryHigh           => "VERY_HIGH",
            ValueStatus::PreDiabetic        => "PRE_DIABETIC",
            ValueStatus::Impaired           => "IMPAIRED",
            ValueStatus::Diabetic           => "DIABETIC",
            ValueStatus::Stage1Hypertension => "STAGE_1_HYPERTENSION",
            ValueStatus::Stage2Hypertension => "STAGE_2_HYPERTENSION",
            ValueStatus::HypertensiveCrisis => "HYPERTENSIVE_CRISIS",
        }
    }

    /// Human-readable form for alert messages.
    pub fn describe(&self) -> String {
        self.as_str().replace('_', " ").to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalySeverity {
    Normal,
    Low,
    Medium,
    High,
}

/// Band a single value fell into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueBand {
    pub status: ValueStatus,
    pub severity: AnomalySeverity,
    pub reference_low: Option<f64>,
    pub reference_high: Option<f64>,
}

impl ValueBand {
    fn new(status: ValueStatus, severity: AnomalySeverity) -> Self {
        Self { status, severity, reference_low: None, reference_high: None }
    }

    fn with_bounds(mut self, low: Option<f64>, high: Option<f64>) -> Self {
        self.reference_low = low;
        self.reference_high = high;
        self
    }

    pub fn is_anomalous(&self) -> bool {
        self.severity != AnomalySeverity::Normal
    }
}

fn a1c(v: f64) -> ValueBand {
    use AnomalySeverity::*;
    if v < 5.7 {
        ValueBand::new(ValueStatus::Normal, Normal)
    } else if v < 6.5 {
        ValueBand::new(ValueStatus::PreDiabetic, Medium)
    } else {
        ValueBand::new(ValueStatus::Diabetic, High)
    }
}

fn glucose(v: f64) -> ValueBand {
    use AnomalySeverity::*;
    if v < 70.0 {
        ValueBand::new(ValueStatus::Low, High)
    } else if v <= 99.0 {
        ValueBand::new(ValueStatus::Normal, Normal)
    } else if v <= 125.0 {
        ValueBand::new(ValueStatus::Impaired, Medium)
    } else {
        ValueBand::new(ValueStatus::Diabetic, High)
    }
}

fn bp_systolic(v: f64) -> ValueBand {
    use AnomalySeverity::*;
    if v < 120.0 {
        ValueBand::new(ValueStatus::Normal, Normal)
    } else if v < 130.0 {
        ValueBand::new(ValueStatus::Elevated, Low)
    } else if v < 140.0 {
        ValueBand::new(ValueStatus::Stage1Hypertension, Medium)
    } else if v <= 180.0 {
        ValueBand::new(ValueStatus::Stage2Hypertension, High)
    } else {
        ValueBand::new(ValueStatus::HypertensiveCrisis, High)
    }
}

fn bp_diastolic(v: f64) -> ValueBand {
    use AnomalySeverity::*;
    if v < 80.0 {
        ValueBand::new(ValueStatus::Normal, Normal)
    } else if v < 90.0 {
        ValueBand::new(ValueStatus::Stage1Hypertension, Medium)
    } else if v <= 120.0 {
        ValueBand::new(ValueStatus::Stage2Hypertension, High)
    } else {
        ValueBand::new(ValueStatus::HypertensiveCrisis, High)
    }
}

fn ldl(v: f64) -> ValueBand {
    use AnomalySeverity::*;
    if v < 100.0 {
        ValueBand::new(ValueStatus::Optimal, Normal)
    } else if v < 130.0 {
        ValueBand::new(ValueStatus::NearOptimal, Normal)
    } else if v < 160.0 {
        ValueBand::new(ValueStatus::BorderlineHigh, Low)
    } else if v < 190.0 {
        ValueBand::new(ValueStatus::High, Medium)
    } else {
        ValueBand::new(ValueStatus::VeryHigh, High)
    }
}

fn triglycerides(v: f64) -> ValueBand {
    use AnomalySeverity::*;
    if v < 150.0 {
        ValueBand::new(ValueStatus::Normal, Normal)
    } else if v < 200.0 {
        ValueBand::new(ValueStatus::BorderlineHigh, Low)
    } else if v < 500.0 {
        ValueBand::new(ValueStatus::High, Medium)
    } else {
        ValueBand::new(ValueStatus::VeryHigh, High)
    }
}

fn total_cholesterol(v: f64) -> ValueBand {
    use AnomalySeverity::*;
    if v < 200.0 {
        ValueBand::new(ValueStatus::Desirable, Normal)
    } else if v < 240.0 {
        ValueBand::new(ValueStatus::BorderlineHigh, Low)
    } else {
        ValueBand::new(ValueStatus::High, Medium)
    }
}

/// Two-band check against the observation's own bounds, then the reference table.
/// Returns `None` when no bound is known for the lab type.
fn two_band(obs: &LabObservation, gender: Option<Gender>) -> Option<ValueBand> {
    let table = reference_range(&obs.lab_type, gender);
    let low = obs.reference_low.or(table.map(|r| r.low));
    let high = obs.reference_high.or(table.map(|r| r.high));
    if low.is_none() && high.is_none() {
        return None;
    }

    let band = match (low, high) {
        (Some(l), _) if obs.value < l => ValueBand::new(ValueStatus::Low, AnomalySeverity::Medium),
        (_, Some(h)) if obs.value > h => ValueBand::new(ValueStatus::High, AnomalySeverity::Medium),
        _ => ValueBand::new(ValueStatus::Normal, AnomalySeverity::Normal),
    };
    Some(band.with_bounds(low, high))
}

/// Classify one observation. `None` means the lab type has no known bounds
/// and the observation carries none either.
pub fn classify(obs: &LabObservation, gender: Option<Gender>) -> Option<ValueBand> {
    let banded = match obs.lab_type {
        LabType::A1c              => a1c(obs.value),
        LabType::Glucose          => glucose(obs.value),
        LabType::BpSystolic       => bp_systolic(obs.value),
        LabType::BpDiastolic      => bp_diastolic(obs.value),
        LabType::Ldl              => ldl(obs.value),
        LabType::Triglycerides    => triglycerides(obs.value),
        LabType::CholesterolTotal => total_cholesterol(obs.value),
        _ => return two_band(obs, gender),
    };
    let table = reference_range(&obs.lab_type, gender);
    Some(banded.with_bounds(table.map(|r| r.low), table.map(|r| r.high)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn obs(lab_type: LabType, value: f64) -> LabObservation {
        LabObservation::new(lab_type, value, Utc::now())
    }

    fn status(lab_type: LabType, value: f64) -> ValueStatus {
        classify(&obs(lab_type, value), None).unwrap().status
    }

    #[test]
    fn test_a1c_bands() {
        assert_eq!(status(LabType::A1c, 5.6), ValueStatus::Normal);
        assert_eq!(status(LabType::A1c, 5.7), ValueStatus::PreDiabetic);
        assert_eq!(status(LabType::A1c, 6.5), ValueStatus::Diabetic);
    }

    #[test]
    fn test_glucose_uses_inclusive_upper_bounds() {
        assert_eq!(status(LabType::Glucose, 69.9), ValueStatus::Low);
        assert_eq!(status(LabType::Glucose, 99.0), ValueStatus::Normal);
        assert_eq!(status(LabType::Glucose, 125.0), ValueStatus::Impaired);
        assert_eq!(status(LabType::Glucose, 126.0), ValueStatus::Diabetic);
    }

    #[test]
    fn test_systolic_five_bands() {
        assert_eq!(status(LabType::BpSystolic, 119.0), ValueStatus::Normal);
        assert_eq!(status(LabType::BpSystolic, 120.0), ValueStatus::Elevated);
        assert_eq!(status(LabType::BpSystolic, 130.0), ValueStatus::Stage1Hypertension);
        assert_eq!(status(LabType::BpSystolic, 180.0), ValueStatus::Stage2Hypertension);
        assert_eq!(status(LabType::BpSystolic, 181.0), ValueStatus::HypertensiveCrisis);
    }

    #[test]
    fn test_diastolic_bands() {
        assert_eq!(status(LabType::BpDiastolic, 79.0), ValueStatus::Normal);
        assert_eq!(status(LabType::BpDiastolic, 85.0), ValueStatus::Stage1Hypertension);
        assert_eq!(status(LabType::BpDiastolic, 120.0), ValueStatus::Stage2Hypertension);
        assert_eq!(status(LabType::BpDiastolic, 121.0), ValueStatus::HypertensiveCrisis);
    }

    #[test]
    fn test_near_optimal_ldl_is_not_anomalous() {
        let band = classify(&obs(LabType::Ldl, 120.0), None).unwrap();
        assert_eq!(band.status, ValueStatus::NearOptimal);
        assert!(!band.is_anomalous());
        assert_eq!(classify(&obs(LabType::Ldl, 195.0), None).unwrap().severity, AnomalySeverity::High);
    }

    #[test]
    fn test_hdl_low_depends_on_gender() {
        let o = obs(LabType::Hdl, 45.0);
        assert!(!classify(&o, Some(Gender::Male)).unwrap().is_anomalous());
        assert_eq!(classify(&o, Some(Gender::Female)).unwrap().status, ValueStatus::Low);
    }

    #[test]
    fn test_observation_bounds_override_table() {
        let o = obs(LabType::Creatinine, 1.2).with_reference(Some(0.5), Some(1.1));
        let band = classify(&o, None).unwrap();
        assert_eq!(band.status, ValueStatus::High);
        assert_eq!(band.reference_high, Some(1.1));
    }

    #[test]
    fn test_unknown_type_needs_bounds() {
        let bare = obs(LabType::Other("FERRITIN".into()), 500.0);
        assert!(classify(&bare, None).is_none());
        let bounded = bare.with_reference(Some(20.0), Some(250.0));
        assert_eq!(classify(&bounded, None).unwrap().status, ValueStatus::High);
    }
}
