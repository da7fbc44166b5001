//! Scorer capability shared by the five domain scorers.
//!
//! A [`Scorer`] maps one domain-specific input to a [`RiskAssessment`] and never
//! fails. Extracting that input from a [`PatientBundle`] is the only fallible
//! step; [`BundleScorer`] erases the input type so the fusion engine can hold a
//! heterogeneous `Vec<Box<dyn BundleScorer>>`.

use medifuse_common::{Domain, PatientBundle, Result, RiskAssessment};
use tracing::debug;

/// Build a domain input from a patient bundle.
pub trait FromBundle: Sized {
    /// Fails with `MalformedInput` when the consumed records are invalid.
    fn from_bundle(bundle: &PatientBundle) -> Result<Self>;
}

pub trait Scorer: Send + Sync {
    type Input: FromBundle;

    const DOMAIN: Domain;

    /// Score one input. Pure and deterministic.
    fn score(&self, input: &Self::Input) -> RiskAssessment;
}

/// Object-safe view of a scorer over whole patient bundles.
pub trait BundleScorer: Send + Sync {
    fn domain(&self) -> Domain;

    /// A scorer runs only when the modality it consumes is present.
    fn applies_to(&self, bundle: &PatientBundle) -> bool {
        bundle.has_modality(self.domain().modality())
    }

    fn score_bundle(&self, bundle: &PatientBundle) -> Result<RiskAssessment>;
}

impl<S: Scorer> BundleScorer for S {
    fn domain(&self) -> Domain {
        S::DOMAIN
    }

    fn score_bundle(&self, bundle: &PatientBundle) -> Result<RiskAssessment> {
        let input = S::Input::from_bundle(bundle)?;
        let assessment = self.score(&input);
        debug!(
            domain = %S::DOMAIN,
            risk_score = assessment.risk_score,
            risk_level = %assessment.risk_level,
            "Domain scored"
        );
        Ok(assessment)
    }
}

/// The stock scorers in invocation order.
pub fn default_scorers() -> Vec<Box<dyn BundleScorer>> {
    vec![
        Box::new(crate::diabetes::DiabetesScorer),
        Box::new(crate::cardiovascular::CardiovascularScorer),
        Box::new(crate::imaging::ImagingScorer),
        Box::new(crate::clinical_notes::ClinicalNoteScorer),
        Box::new(crate::genomics::GenomicsScorer),
    ]
}
