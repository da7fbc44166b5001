//! Lab reference ranges and rate-of-change thresholds.

use std::collections::HashMap;
use std::sync::OnceLock;

use medifuse_common::{Gender, LabType};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceRange {
    pub unit: &'static str,
    pub low: f64,
    pub high: f64,
}

impl ReferenceRange {
    const fn new(unit: &'static str, low: f64, high: f64) -> Self {
        Self { unit, low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Per-interval change that raises a warning or critical rate alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateThreshold {
    pub warning: f64,
    pub critical: f64,
}

/// Which movement of a lab value is clinically adverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdverseDirection {
    Rising,
    Falling,
    Either,
}

struct LabReference {
    range: ReferenceRange,
    male: Option<ReferenceRange>,
    female: Option<ReferenceRange>,
    rate: RateThreshold,
    adverse: AdverseDirection,
}

fn table() -> &'static HashMap<LabType, LabReference> {
    static TABLE: OnceLock<HashMap<LabType, LabReference>> = OnceLock::new();
    TABLE.get_or_init(|| {
        use AdverseDirection::*;
        let entry = |range, rate: (f64, f64), adverse| LabReference {
            range,
            male: None,
            female: None,
            rate: RateThreshold { warning: rate.0, critical: rate.1 },
            adverse,
        };

        let mut m = HashMap::new();
        m.insert(LabType::A1c,              entry(ReferenceRange::new("%", 4.0, 5.6), (0.3, 0.5), Rising));
        m.insert(LabType::Glucose,          entry(ReferenceRange::new("mg/dL", 70.0, 100.0), (10.0, 25.0), Rising));
        m.insert(LabType::CholesterolTotal, entry(ReferenceRange::new("mg/dL", 0.0, 200.0), (20.0, 40.0), Rising));
        m.insert(LabType::Ldl,              entry(ReferenceRange::new("mg/dL", 0.0, 100.0), (15.0, 30.0), Rising));
        m.insert(LabType::Triglycerides,    entry(ReferenceRange::new("mg/dL", 0.0, 150.0), (30.0, 75.0), Rising));
        m.insert(LabType::BpSystolic,       entry(ReferenceRange::new("mmHg", 90.0, 120.0), (8.0, 15.0), Rising));
        m.insert(LabType::BpDiastolic,      entry(ReferenceRange::new("mmHg", 60.0, 80.0), (5.0, 10.0), Rising));
        m.insert(LabType::HeartRate,        entry(ReferenceRange::new("bpm", 60.0, 100.0), (8.0, 15.0), Either));
        m.insert(LabType::Creatinine,       entry(ReferenceRange::new("mg/dL", 0.7, 1.3), (0.2, 0.4), Rising));
        m.insert(LabType::Wbc,              entry(ReferenceRange::new("K/uL", 4.5, 11.0), (2.0, 4.0), Either));
        m.insert(LabType::Platelets,        entry(ReferenceRange::new("K/uL", 150.0, 400.0), (40.0, 80.0), Either));

        let mut hdl = entry(ReferenceRange::new("mg/dL", 40.0, 999.0), (5.0, 10.0), Falling);
        hdl.male = Some(ReferenceRange::new("mg/dL", 40.0, 999.0));
        hdl.female = Some(ReferenceRange::new("mg/dL", 50.0, 999.0));
        m.insert(LabType::Hdl, hdl);

        let mut hgb = entry(ReferenceRange::new("g/dL", 12.0, 17.5), (1.0, 2.0), Either);
        hgb.male = Some(ReferenceRange::new("g/dL", 13.5, 17.5));
        hgb.female = Some(ReferenceRange::new("g/dL", 12.0, 15.5));
        m.insert(LabType::Hemoglobin, hgb);

        m
    })
}

/// Reference range for a lab type, using the gender-specific range where one exists.
pub fn reference_range(lab_type: &LabType, gender: Option<Gender>) -> Option<ReferenceRange> {
    let entry = table().get(lab_type)?;
    let specific = match gender {
        Some(Gender::Male)   => entry.male,
        Some(Gender::Female) => entry.female,
        _                    => None,
    };
    Some(specific.unwrap_or(entry.range))
}

pub fn rate_threshold(lab_type: &LabType) -> Option<(RateThreshold, AdverseDirection)> {
    table().get(lab_type).map(|e| (e.rate, e.adverse))
}
