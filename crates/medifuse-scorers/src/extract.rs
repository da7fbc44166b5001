//! Checked extraction of scorer inputs from a patient bundle.

use medifuse_common::{Domain, LabType, MedifuseError, PatientBundle, Result};

/// Chronological values of one lab type. Every consumed observation is validated.
pub fn lab_values(bundle: &PatientBundle, lab_type: &LabType, domain: Domain) -> Result<Vec<f64>> {
    bundle
        .lab_series(lab_type)
        .into_iter()
        .map(|obs| obs.validate(domain).map(|_| obs.value))
        .collect()
}

/// Most recent value of one lab type, if any.
pub fn latest_lab_value(bundle: &PatientBundle, lab_type: &LabType, domain: Domain) -> Result<Option<f64>> {
    Ok(lab_values(bundle, lab_type, domain)?.last().copied())
}

/// Demographic measurements (age, BMI) must be finite and non-negative when present.
pub fn demographic(value: Option<f64>, field: &str, domain: Domain) -> Result<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(MedifuseError::malformed(
            domain,
            format!("{field} {v} is not a valid measurement"),
        )),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medifuse_common::LabObservation;

    #[test]
    fn test_negative_age_is_malformed() {
        assert!(demographic(Some(-3.0), "age", Domain::Diabetes).is_err());
        assert_eq!(demographic(None, "age", Domain::Diabetes).unwrap(), None);
    }

    #[test]
    fn test_lab_values_rejects_nan() {
        let now = chrono::Utc::now();
        let bundle = PatientBundle {
            labs: vec![LabObservation::new(LabType::Ldl, f64::NAN, now)],
            ..Default::default()
        };
        assert!(lab_values(&bundle, &LabType::Ldl, Domain::Cardiovascular).is_err());
        assert!(lab_values(&bundle, &LabType::Hdl, Domain::Cardiovascular).unwrap().is_empty());
    }
}
