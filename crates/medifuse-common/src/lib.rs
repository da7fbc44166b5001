//! medifuse-common — Shared value types, errors, and configuration used across all Medifuse crates.

pub mod error;
pub mod entities;
pub mod assessment;
pub mod details;
pub mod confidence;
pub mod config;
pub mod util;

// Re-export commonly used types
pub use error::{MedifuseError, Result};
pub use entities::{
    AcmgClassification, ClinicalNoteSignal, DataModality, Gender, GenomicVariant, ImagingModality,
    ImagingRecord, LabObservation, LabType, PatientBundle,
};
pub use assessment::{
    Domain, DomainDetails, Factor, FusedAssessment, Impact, PredictionType, RiskAssessment,
    RiskLevel, SkippedDomain, TrendDirection,
};
pub use config::{DomainWeights, EngineConfig, ExecutionConfig, FusionConfig};
