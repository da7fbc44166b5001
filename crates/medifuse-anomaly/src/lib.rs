//! medifuse-anomaly — Lab anomaly and trend detection.
//!
//! Classifies the latest value of every lab type against per-type reference
//! bands and, for longitudinal series, computes trend statistics and
//! rate-of-change alerts. Independent of the domain scorers.

pub mod bands;
pub mod detector;
pub mod trend;

pub use bands::{classify, AnomalySeverity, ValueBand, ValueStatus};
pub use detector::{Alert, AlertKind, AlertPriority, Anomaly, AnomalyDetector, AnomalyReport};
pub use trend::{analyze_trend, RateAlert, TrendReport, Volatility};
