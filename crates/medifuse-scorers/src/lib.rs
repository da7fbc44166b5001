//! medifuse-scorers — Domain risk scorers.
//!
//! Five deterministic rule evaluators, one per clinical domain. Each takes its
//! own input type and returns a fresh [`RiskAssessment`](medifuse_common::RiskAssessment).

pub mod cardiovascular;
pub mod clinical_notes;
pub mod diabetes;
pub mod extract;
pub mod genomics;
pub mod imaging;
pub mod normalise;
pub mod scorer;

pub use cardiovascular::{CardiovascularInput, CardiovascularScorer};
pub use clinical_notes::ClinicalNoteScorer;
pub use diabetes::{DiabetesInput, DiabetesScorer};
pub use genomics::{GenomicsInput, GenomicsScorer};
pub use imaging::ImagingScorer;
pub use scorer::{default_scorers, BundleScorer, FromBundle, Scorer};
