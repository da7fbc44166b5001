//! Small numeric and list helpers shared by scorers and fusion.

use std::collections::HashSet;

/// Round to three decimals, the precision every reported score uses.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Deduplicate preserving first occurrence, then truncate to `cap`.
pub fn dedup_capped<I, S>(items: I, cap: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if out.len() >= cap {
            break;
        }
        let item: String = item.into();
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}

/// Replace a missing or non-finite value with `default`.
pub fn or_default(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}
