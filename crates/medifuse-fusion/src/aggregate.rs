//! Weighted aggregation of domain risk scores.
//!
//! overall = min(cap, mean_blend × mean(wᵢ·sᵢ) + max_blend × max(wᵢ·sᵢ))
//!
//! Weighted scores may exceed 1.0 before the cap is applied.

use medifuse_common::util::round3;
use medifuse_common::{DomainWeights, FusionConfig, RiskAssessment, RiskLevel};

const MODERATE_FROM: f64 = 0.2;
const HIGH_FROM: f64 = 0.4;
const CRITICAL_FROM: f64 = 0.7;

/// Each domain's risk score times its configured weight, in input order.
pub fn weighted_scores(assessments: &[RiskAssessment], weights: &DomainWeights) -> Vec<f64> {
    assessments
        .iter()
        .map(|a| a.risk_score * weights.weight(a.domain()))
        .collect()
}

/// Blend weighted scores into the overall risk score.
pub fn blend(weighted: &[f64], config: &FusionConfig) -> f64 {
    if weighted.is_empty() {
        return config.empty_score;
    }
    let mean = weighted.iter().sum::<f64>() / weighted.len() as f64;
    let max = weighted.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let blended = config.mean_blend * mean + config.max_blend * max;
    round3(blended.min(config.overall_cap).max(0.0))
}

pub fn overall_level(score: f64) -> RiskLevel {
    RiskLevel::bucket(score, MODERATE_FROM, HIGH_FROM, CRITICAL_FROM)
}
