/// Confidence model for domain and fused assessments.
/// Confidence never affects risk; it only qualifies how much the risk can be trusted.

/// Confidence reported when no domain produced evidence.
pub const NO_EVIDENCE_CONFIDENCE: f64 = 0.5;

/// Scale a scorer's base confidence by an input-quality score in [0, 1].
/// Quality 1.0 keeps the base; quality 0.0 would keep 60 % of it.
pub fn quality_adjusted(base: f64, quality: f64) -> f64 {
    let quality = quality.clamp(0.0, 1.0);
    (base * (0.6 + 0.4 * quality)).clamp(0.0, 1.0)
}

/// Fused confidence: mean of the domain confidences, multiplied by
/// `skip_penalty` once per scheduled domain that could not be scored.
pub fn fused_confidence(domain_confidences: &[f64], skipped_domains: usize, skip_penalty: f64) -> f64 {
    let base = if domain_confidences.is_empty() {
        NO_EVIDENCE_CONFIDENCE
    } else {
        domain_confidences.iter().sum::<f64>() / domain_confidences.len() as f64
    };
    let penalty = skip_penalty.clamp(0.0, 1.0).powi(skipped_domains as i32);
    (base * penalty).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_domains_is_no_evidence() {
        assert_eq!(fused_confidence(&[], 0, 0.9), NO_EVIDENCE_CONFIDENCE);
    }

    #[test]
    fn test_mean_of_domains() {
        let c = fused_confidence(&[0.85, 0.75], 0, 0.9);
        assert!((c - 0.80).abs() < 1e-9);
    }

    #[test]
    fn test_skipped_domain_lowers_confidence() {
        let full = fused_confidence(&[0.85], 0, 0.9);
        let skipped = fused_confidence(&[0.85], 1, 0.9);
        assert!(skipped < full);
        assert!((skipped - 0.765).abs() < 1e-9);
    }

    #[test]
    fn test_quality_adjusted_bounds() {
        assert!((quality_adjusted(0.85, 1.0) - 0.85).abs() < 1e-9);
        assert!(quality_adjusted(0.85, 0.7) < 0.85);
        assert!(quality_adjusted(0.85, 0.7) > 0.7);
    }
}
