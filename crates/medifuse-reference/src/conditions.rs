//! Condition → severity lookup for clinical note signals.

use medifuse_common::assessment::ConditionSeverity;

/// Ordered keyword table. Matching is a case-insensitive substring test and
/// the first hit wins, so "kidney disease" must stay after "diabetes" etc.
static CONDITION_SEVERITY: &[(&str, ConditionSeverity)] = &[
    ("diabetes",       ConditionSeverity::Chronic),
    ("cancer",         ConditionSeverity::Critical),
    ("hypertension",   ConditionSeverity::Chronic),
    ("heart disease",  ConditionSeverity::High),
    ("obesity",        ConditionSeverity::Moderate),
    ("depression",     ConditionSeverity::Moderate),
    ("copd",           ConditionSeverity::Chronic),
    ("asthma",         ConditionSeverity::Chronic),
    ("kidney disease", ConditionSeverity::High),
    ("arthritis",      ConditionSeverity::Chronic),
];

/// Severity of one free-text condition; unmatched conditions are MODERATE.
pub fn condition_severity(condition: &str) -> ConditionSeverity {
    let lower = condition.to_lowercase();
    CONDITION_SEVERITY
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, severity)| *severity)
        .unwrap_or(ConditionSeverity::Moderate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match_is_case_insensitive() {
        assert_eq!(condition_severity("Metastatic Breast CANCER"), ConditionSeverity::Critical);
        assert_eq!(condition_severity("Type 2 Diabetes"), ConditionSeverity::Chronic);
    }

    #[test]
    fn test_first_hit_wins() {
        // both "diabetes" and "kidney disease" match; diabetes is listed first
        assert_eq!(condition_severity("diabetes with kidney disease"), ConditionSeverity::Chronic);
    }

    #[test]
    fn test_unknown_condition_defaults_to_moderate() {
        assert_eq!(condition_severity("migraine"), ConditionSeverity::Moderate);
    }
}
