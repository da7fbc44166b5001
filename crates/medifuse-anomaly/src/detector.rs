//! Anomaly detection over a patient's lab observations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use medifuse_common::util::round3;
use medifuse_common::{Gender, LabObservation, LabType, PatientBundle};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bands::{classify, AnomalySeverity, ValueStatus};
use crate::trend::{analyze_trend, RateAlert, TrendReport};

const ANOMALY_WEIGHT: f64 = 0.15;
const HIGH_ALERT_WEIGHT: f64 = 0.2;

/// A latest value outside its normal band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub lab_type: LabType,
    pub value: f64,
    pub unit: String,
    pub status: ValueStatus,
    pub severity: AnomalySeverity,
    pub reference_low: Option<f64>,
    pub reference_high: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertPriority {
    Low,
    Medium,
    High,
}

impl From<AnomalySeverity> for AlertPriority {
    fn from(severity: AnomalySeverity) -> Self {
        match severity {
            AnomalySeverity::High                           => AlertPriority::High,
            AnomalySeverity::Medium                         => AlertPriority::Medium,
            AnomalySeverity::Low | AnomalySeverity::Normal  => AlertPriority::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    AbnormalValue,
    ConcerningTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub lab_type: LabType,
    pub kind: AlertKind,
    pub priority: AlertPriority,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub anomalies: Vec<Anomaly>,
    pub trends: BTreeMap<LabType, TrendReport>,
    /// HIGH priority first; ties keep discovery order.
    pub alerts: Vec<Alert>,
    pub anomaly_score: f64,
    pub observations_analyzed: usize,
    pub message: String,
}

/// Stateless detector. Reference data comes from the shared static tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnomalyDetector;

impl AnomalyDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect_bundle(&self, bundle: &PatientBundle) -> AnomalyReport {
        self.detect(&bundle.labs, bundle.gender)
    }

    /// Analyse observations in any order. Observations whose value is
    /// negative or not finite are ignored.
    pub fn detect(&self, observations: &[LabObservation], gender: Option<Gender>) -> AnomalyReport {
        let mut by_type: BTreeMap<LabType, Vec<&LabObservation>> = BTreeMap::new();
        let mut analyzed = 0;
        for obs in observations {
            if !obs.value.is_finite() || obs.value < 0.0 {
                debug!(lab_type = %obs.lab_type, value = obs.value, "Ignoring invalid observation");
                continue;
            }
            analyzed += 1;
            by_type.entry(obs.lab_type.clone()).or_default().push(obs);
        }

        let mut anomalies = Vec::new();
        let mut trends = BTreeMap::new();
        let mut alerts = Vec::new();

        for (lab_type, mut series) in by_type {
            series.sort_by_key(|o| o.recorded_at);
            let Some(latest) = series.last().copied() else {
                continue;
            };

            if let Some(band) = classify(latest, gender).filter(|b| b.is_anomalous()) {
                alerts.push(Alert {
                    lab_type: lab_type.clone(),
                    kind: AlertKind::AbnormalValue,
                    priority: band.severity.into(),
                    message: value_message(latest, band.status),
                });
                anomalies.push(Anomaly {
                    lab_type: lab_type.clone(),
                    value: latest.value,
                    unit: latest.unit.clone(),
                    status: band.status,
                    severity: band.severity,
                    reference_low: band.reference_low,
                    reference_high: band.reference_high,
                    recorded_at: latest.recorded_at,
                });
            }

            let values: Vec<f64> = series.iter().map(|o| o.value).collect();
            if let Some(trend) = analyze_trend(&lab_type, &values) {
                if trend.is_concerning {
                    alerts.push(Alert {
                        lab_type: lab_type.clone(),
                        kind: AlertKind::ConcerningTrend,
                        priority: match trend.rate_alert {
                            Some(RateAlert::Critical) => AlertPriority::High,
                            _                         => AlertPriority::Medium,
                        },
                        message: trend_message(&trend),
                    });
                }
                debug!(
                    lab_type = %lab_type,
                    observations = trend.observations,
                    percent_change = trend.percent_change,
                    concerning = trend.is_concerning,
                    "Trend analysed"
                );
                trends.insert(lab_type, trend);
            }
        }

        // Stable sort keeps discovery order within a priority.
        alerts.sort_by(|a, b| b.priority.cmp(&a.priority));

        let high_alerts = alerts.iter().filter(|a| a.priority == AlertPriority::High).count();
        let anomaly_score =
            round3((ANOMALY_WEIGHT * anomalies.len() as f64 + HIGH_ALERT_WEIGHT * high_alerts as f64).min(1.0));
        let concerning = trends.values().filter(|t| t.is_concerning).count();

        let message = if analyzed == 0 {
            "No lab observations to analyze".to_string()
        } else if anomalies.is_empty() && concerning == 0 {
            "All analyzed values within expected ranges".to_string()
        } else {
            format!("{} anomalies and {} concerning trends detected", anomalies.len(), concerning)
        };

        info!(
            observations = analyzed,
            anomalies = anomalies.len(),
            alerts = alerts.len(),
            anomaly_score,
            "Anomaly detection complete"
        );

        AnomalyReport {
            anomalies,
            trends,
            alerts,
            anomaly_score,
            observations_analyzed: analyzed,
            message,
        }
    }
}

fn value_message(obs: &LabObservation, status: ValueStatus) -> String {
    let unit = if obs.unit.is_empty() { String::new() } else { format!(" {}", obs.unit) };
    format!("{} {}{} is {}", obs.lab_type, obs.value, unit, status.describe())
}

fn trend_message(trend: &TrendReport) -> String {
    let rate = match trend.rate_alert {
        Some(RateAlert::Critical) => "critical",
        _                         => "rapid",
    };
    format!(
        "{} shows {} change: {:+.2}% over {} readings",
        trend.lab_type, rate, trend.percent_change, trend.observations
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::days(day)
    }

    #[test]
    fn test_empty_input() {
        let report = AnomalyDetector::new().detect(&[], None);
        assert!(report.anomalies.is_empty());
        assert_eq!(report.anomaly_score, 0.0);
        assert_eq!(report.message, "No lab observations to analyze");
    }

    #[test]
    fn test_latest_value_is_classified_regardless_of_order() {
        let labs = vec![
            LabObservation::new(LabType::Glucose, 150.0, at(10)),
            LabObservation::new(LabType::Glucose, 92.0, at(40)),
        ];
        let report = AnomalyDetector::new().detect(&labs, None);
        assert!(report.anomalies.is_empty());
        assert!(report.trends.contains_key(&LabType::Glucose));
    }

    #[test]
    fn test_high_priority_alerts_come_first() {
        let labs = vec![
            LabObservation::new(LabType::Ldl, 140.0, at(0)),
            LabObservation::new(LabType::BpSystolic, 185.0, at(0)),
        ];
        let report = AnomalyDetector::new().detect(&labs, None);
        assert_eq!(report.alerts.len(), 2);
        assert_eq!(report.alerts[0].priority, AlertPriority::High);
        assert_eq!(report.alerts[0].lab_type, LabType::BpSystolic);
        // 2 anomalies, 1 high alert
        assert_eq!(report.anomaly_score, 0.5);
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let labs = vec![
            LabObservation::new(LabType::A1c, f64::NAN, at(0)),
            LabObservation::new(LabType::A1c, 5.2, at(1)),
        ];
        let report = AnomalyDetector::new().detect(&labs, None);
        assert_eq!(report.observations_analyzed, 1);
        assert!(report.trends.is_empty());
    }

    #[test]
    fn test_score_is_capped() {
        let labs: Vec<LabObservation> = [
            LabType::A1c, LabType::Glucose, LabType::BpSystolic, LabType::BpDiastolic,
            LabType::Ldl, LabType::Triglycerides,
        ]
        .into_iter()
        .map(|t| LabObservation::new(t, 900.0, at(0)))
        .collect();
        let report = AnomalyDetector::new().detect(&labs, None);
        assert_eq!(report.anomaly_score, 1.0);
    }
}
