//! medifuse-fusion — Multi-modal fusion engine.
//!
//! Runs every domain scorer whose input modality is present, then merges the
//! per-domain assessments into one weighted, explainable [`FusedAssessment`].
//!
//! [`FusedAssessment`]: medifuse_common::FusedAssessment

pub mod aggregate;
pub mod engine;
pub mod summary;

pub use aggregate::{blend, overall_level, weighted_scores};
pub use engine::FusionEngine;
pub use summary::{domain_clause, summarize};
