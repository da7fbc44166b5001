//! medifuse-reference — Static clinical reference tables.
//!
//! Every table is immutable and initialised once per process; scorers and the
//! anomaly detector read them concurrently without synchronisation.

pub mod acmg;
pub mod conditions;
pub mod genes;
pub mod imaging;
pub mod labs;

pub use acmg::{acmg_tier, is_actionable_tier};
pub use conditions::condition_severity;
pub use genes::{gene_info, syndromes, GeneInfo, Syndrome};
pub use imaging::{finding_catalog, severity_recommendations, severity_risk_score, CatalogFinding, FindingCatalog};
pub use labs::{rate_threshold, reference_range, AdverseDirection, RateThreshold, ReferenceRange};
