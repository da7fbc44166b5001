//! Contribution helpers for additive threshold scoring.

/// Linear contribution of `value` above `baseline`, scaled by `per_unit` and capped.
/// Zero at or below the baseline.
pub fn capped_excess(value: f64, baseline: f64, per_unit: f64, cap: f64) -> f64 {
    if value > baseline {
        ((value - baseline) * per_unit).min(cap)
    } else {
        0.0
    }
}

/// Linear contribution of `value` below `baseline`, scaled by `per_unit` and capped.
pub fn capped_deficit(value: f64, baseline: f64, per_unit: f64, cap: f64) -> f64 {
    if value < baseline {
        ((baseline - value) * per_unit).min(cap)
    } else {
        0.0
    }
}

/// Optional variant: absent values contribute nothing.
pub fn excess_of(value: Option<f64>, baseline: f64, per_unit: f64, cap: f64) -> f64 {
    value.map_or(0.0, |v| capped_excess(v, baseline, per_unit, cap))
}

/// Format a lab value without trailing `.0` noise: 160 → "160", 6.75 → "6.75".
pub fn display_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{value:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capped_excess() {
        assert_eq!(capped_excess(100.0, 100.0, 1.0 / 200.0, 0.25), 0.0);
        assert!((capped_excess(150.0, 100.0, 1.0 / 200.0, 0.25) - 0.25).abs() < 1e-12);
        assert!((capped_excess(300.0, 100.0, 1.0 / 200.0, 0.25) - 0.25).abs() < 1e-12);
        assert!((capped_excess(120.0, 100.0, 1.0 / 200.0, 0.25) - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_capped_deficit() {
        assert_eq!(capped_deficit(60.0, 60.0, 0.01, 0.15), 0.0);
        assert!((capped_deficit(35.0, 60.0, 0.01, 0.15) - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_absent_value_contributes_nothing() {
        assert_eq!(excess_of(None, 100.0, 1.0, 1.0), 0.0);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(160.0), "160");
        assert_eq!(display_value(6.75), "6.75");
        assert_eq!(display_value(7.1), "7.1");
    }
}
