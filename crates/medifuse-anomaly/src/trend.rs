//! Trend statistics over one lab type's chronological series.

use medifuse_common::util::{round3, round_to};
use medifuse_common::{LabType, TrendDirection};
use medifuse_reference::{rate_threshold, AdverseDirection};
use serde::{Deserialize, Serialize};

/// Percent change inside this band (either way) counts as stable.
pub const STABLE_BAND_PERCENT: f64 = 2.0;

const VOLATILITY_MODERATE_FROM: f64 = 0.10;
const VOLATILITY_HIGH_FROM: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Volatility {
    Low,
    Moderate,
    High,
}

impl Volatility {
    /// Bucket the coefficient of variation.
    pub fn from_cv(cv: f64) -> Self {
        if cv < VOLATILITY_MODERATE_FROM {
            Volatility::Low
        } else if cv < VOLATILITY_HIGH_FROM {
            Volatility::Moderate
        } else {
            Volatility::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateAlert {
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub lab_type: LabType,
    pub trend: TrendDirection,
    pub first_value: f64,
    pub last_value: f64,
    pub absolute_change: f64,
    pub percent_change: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub volatility: Volatility,
    /// Mean change per interval between consecutive observations.
    pub average_change: f64,
    pub rate_alert: Option<RateAlert>,
    pub is_concerning: bool,
    pub observations: usize,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// Sample standard deviation (n - 1).
fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

fn coefficient_of_variation(std_dev: f64, mean: f64) -> f64 {
    if mean == 0.0 {
        if std_dev == 0.0 { 0.0 } else { f64::INFINITY }
    } else {
        std_dev / mean.abs()
    }
}

fn is_adverse(direction: AdverseDirection, change: f64) -> bool {
    match direction {
        AdverseDirection::Rising  => change > 0.0,
        AdverseDirection::Falling => change < 0.0,
        AdverseDirection::Either  => change != 0.0,
    }
}

/// Trend of a chronological series. Needs at least two values.
pub fn analyze_trend(lab_type: &LabType, values: &[f64]) -> Option<TrendReport> {
    if values.len() < 2 {
        return None;
    }
    let first = values[0];
    let last = values[values.len() - 1];
    let change = last - first;

    let (percent_change, trend) = if first == 0.0 {
        (0.0, TrendDirection::from_endpoints(first, last))
    } else {
        let pct = change / first.abs() * 100.0;
        (pct, TrendDirection::from_percent_change(pct, STABLE_BAND_PERCENT))
    };

    let avg = mean(values);
    let sd = std_dev(values, avg);
    let average_change = change / (values.len() - 1) as f64;

    let (rate_alert, is_concerning) = match rate_threshold(lab_type) {
        Some((threshold, adverse)) => {
            let magnitude = average_change.abs();
            let alert = if magnitude > threshold.critical {
                Some(RateAlert::Critical)
            } else if magnitude > threshold.warning {
                Some(RateAlert::Warning)
            } else {
                None
            };
            (alert, alert.is_some() && is_adverse(adverse, average_change))
        }
        None => (None, false),
    };

    Some(TrendReport {
        lab_type: lab_type.clone(),
        trend,
        first_value: first,
        last_value: last,
        absolute_change: round3(change),
        percent_change: round_to(percent_change, 2),
        mean: round3(avg),
        std_dev: round3(sd),
        volatility: Volatility::from_cv(coefficient_of_variation(sd, avg)),
        average_change: round3(average_change),
        rate_alert,
        is_concerning,
        observations: values.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rising_a1c_is_concerning() {
        let t = analyze_trend(&LabType::A1c, &[5.0, 5.2, 5.5, 6.0]).unwrap();
        assert_eq!(t.trend, TrendDirection::Increasing);
        assert_eq!(t.percent_change, 20.0);
        assert_eq!(t.absolute_change, 1.0);
        assert_eq!(t.average_change, 0.333);
        assert_eq!(t.rate_alert, Some(RateAlert::Warning));
        assert!(t.is_concerning);
        assert_eq!(t.volatility, Volatility::Low);
    }

    #[test]
    fn test_falling_a1c_alerts_but_is_not_concerning() {
        let t = analyze_trend(&LabType::A1c, &[7.5, 6.5]).unwrap();
        assert_eq!(t.trend, TrendDirection::Decreasing);
        assert_eq!(t.rate_alert, Some(RateAlert::Critical));
        assert!(!t.is_concerning);
    }

    #[test]
    fn test_falling_hdl_is_concerning() {
        let t = analyze_trend(&LabType::Hdl, &[62.0, 50.0]).unwrap();
        assert_eq!(t.rate_alert, Some(RateAlert::Critical));
        assert!(t.is_concerning);
    }

    #[test]
    fn test_rate_equal_to_threshold_does_not_escalate() {
        // average change of exactly 0.5 sits on the A1C critical threshold
        let t = analyze_trend(&LabType::A1c, &[5.0, 5.5]).unwrap();
        assert_eq!(t.average_change, 0.5);
        assert_eq!(t.rate_alert, Some(RateAlert::Warning));

        let t = analyze_trend(&LabType::Glucose, &[100.0, 110.0]).unwrap();
        assert_eq!(t.rate_alert, None);
    }

    #[test]
    fn test_small_change_is_stable() {
        let t = analyze_trend(&LabType::Glucose, &[100.0, 101.5]).unwrap();
        assert_eq!(t.trend, TrendDirection::Stable);
        assert_eq!(t.rate_alert, None);
        assert!(!t.is_concerning);
    }

    #[test]
    fn test_zero_first_value_uses_endpoints() {
        let t = analyze_trend(&LabType::Other("CRP".into()), &[0.0, 3.0]).unwrap();
        assert_eq!(t.percent_change, 0.0);
        assert_eq!(t.trend, TrendDirection::Increasing);
        assert_eq!(t.rate_alert, None);
    }

    #[test]
    fn test_volatility_buckets() {
        assert_eq!(Volatility::from_cv(0.05), Volatility::Low);
        assert_eq!(Volatility::from_cv(0.10), Volatility::Moderate);
        assert_eq!(Volatility::from_cv(0.3), Volatility::High);
        let t = analyze_trend(&LabType::Triglycerides, &[100.0, 300.0, 120.0]).unwrap();
        assert_eq!(t.volatility, Volatility::High);
    }

    #[test]
    fn test_single_value_has_no_trend() {
        assert!(analyze_trend(&LabType::A1c, &[6.1]).is_none());
    }
}
