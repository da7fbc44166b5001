//! Fusion engine: schedule, run and merge the domain scorers.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::panic::{self, AssertUnwindSafe};

use medifuse_common::assessment::MODEL_VERSION;
use medifuse_common::confidence::fused_confidence;
use medifuse_common::util::{dedup_capped, round3};
use medifuse_common::{
    DataModality, Domain, EngineConfig, FusedAssessment, MedifuseError, PatientBundle,
    PredictionType, Result, RiskAssessment, SkippedDomain,
};
use medifuse_scorers::{default_scorers, BundleScorer};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::aggregate::{blend, overall_level, weighted_scores};
use crate::summary::summarize;

/// Holds configuration and scorers only; safe to share across threads.
pub struct FusionEngine {
    config: EngineConfig,
    scorers: Vec<Box<dyn BundleScorer>>,
}

impl Default for FusionEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            scorers: default_scorers(),
        }
    }
}

impl FusionEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_scorers(config, default_scorers())
    }

    /// Engine over a custom scorer set. Scorers run in the order given;
    /// at most one scorer per domain.
    pub fn with_scorers(config: EngineConfig, scorers: Vec<Box<dyn BundleScorer>>) -> Result<Self> {
        config.fusion.validate()?;
        let mut seen = HashSet::new();
        for scorer in &scorers {
            if !seen.insert(scorer.domain()) {
                return Err(MedifuseError::Config(format!(
                    "more than one scorer registered for {}",
                    scorer.domain()
                )));
            }
        }
        Ok(Self { config, scorers })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Domains whose input modality is present in the bundle, in invocation order.
    pub fn scheduled_domains(&self, bundle: &PatientBundle) -> Vec<Domain> {
        self.scorers
            .iter()
            .filter(|s| s.applies_to(bundle))
            .map(|s| s.domain())
            .collect()
    }

    /// Score every applicable domain and fuse the results. Never fails: a
    /// domain with malformed input, or whose scorer panics, is reported in
    /// `skipped_domains` and left out of the fusion.
    pub fn assess(&self, bundle: &PatientBundle) -> FusedAssessment {
        let scheduled: Vec<&dyn BundleScorer> = self
            .scorers
            .iter()
            .filter(|s| s.applies_to(bundle))
            .map(|s| s.as_ref())
            .collect();

        // Ordered collect is the join point: every scorer finishes before fusion.
        let outcomes: Vec<(Domain, Result<RiskAssessment>)> = if self.config.execution.parallel {
            scheduled.par_iter().map(|s| run_guarded(*s, bundle)).collect()
        } else {
            scheduled.iter().map(|s| run_guarded(*s, bundle)).collect()
        };

        let mut assessments = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for (domain, outcome) in outcomes {
            match outcome {
                Ok(assessment) => assessments.push(assessment),
                Err(e) => {
                    warn!(domain = %domain, error = %e, "Domain skipped");
                    skipped.push(SkippedDomain { domain, reason: e.to_string() });
                }
            }
        }

        self.fuse(assessments, skipped)
    }

    fn fuse(&self, assessments: Vec<RiskAssessment>, skipped: Vec<SkippedDomain>) -> FusedAssessment {
        let cfg = &self.config.fusion;

        let weighted = weighted_scores(&assessments, &cfg.weights);
        let overall_risk_score = blend(&weighted, cfg);
        let overall_risk_level = overall_level(overall_risk_score);

        let confidences: Vec<f64> = assessments.iter().map(|a| a.confidence).collect();
        let confidence = round3(fused_confidence(&confidences, skipped.len(), cfg.skipped_domain_penalty));

        let recommendations = dedup_capped(
            assessments.iter().flat_map(|a| a.recommendations.iter().cloned()),
            cfg.max_recommendations,
        );
        let contributing_factors = assessments
            .iter()
            .flat_map(|a| a.contributing_factors.iter().cloned())
            .take(cfg.max_factors)
            .collect();
        let modalities_used: BTreeSet<DataModality> = assessments
            .iter()
            .flat_map(|a| a.modalities_used.iter().copied())
            .collect();
        let summary = summarize(&assessments);

        info!(
            domains = assessments.len(),
            skipped = skipped.len(),
            overall_risk_score,
            overall_risk_level = %overall_risk_level,
            "Fused assessment complete"
        );

        let domain_assessments: BTreeMap<Domain, RiskAssessment> =
            assessments.into_iter().map(|a| (a.domain(), a)).collect();

        FusedAssessment {
            prediction_type: PredictionType::MultiModalFusion,
            overall_risk_score,
            overall_risk_level,
            confidence,
            domain_assessments,
            contributing_factors,
            recommendations,
            modalities_used,
            skipped_domains: skipped,
            summary,
            model_version: MODEL_VERSION.to_string(),
        }
    }
}

fn run_guarded(scorer: &dyn BundleScorer, bundle: &PatientBundle) -> (Domain, Result<RiskAssessment>) {
    let domain = scorer.domain();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| scorer.score_bundle(bundle)))
        .unwrap_or_else(|_| Err(MedifuseError::ScorerPanicked { domain }));
    (domain, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medifuse_common::{ImagingModality, LabType, RiskLevel};
    use medifuse_test_utils::{full_bundle, labs_only_bundle, BundleBuilder};
    use pretty_assertions::assert_eq;

    struct PanickingScorer;

    impl BundleScorer for PanickingScorer {
        fn domain(&self) -> Domain {
            Domain::Imaging
        }

        fn score_bundle(&self, _bundle: &PatientBundle) -> Result<RiskAssessment> {
            panic!("scorer failure")
        }
    }

    #[test]
    fn test_empty_bundle() {
        let fused = FusionEngine::default().assess(&PatientBundle::default());
        assert_eq!(fused.overall_risk_score, 0.1);
        assert_eq!(fused.overall_risk_level, RiskLevel::Low);
        assert_eq!(fused.confidence, 0.5);
        assert!(fused.domain_assessments.is_empty());
        assert!(fused.modalities_used.is_empty());
        assert_eq!(fused.summary, "Awaiting data for comprehensive analysis");
    }

    #[test]
    fn test_labs_only_runs_lab_domains() {
        let fused = FusionEngine::default().assess(&labs_only_bundle());
        assert_eq!(fused.domains(), vec![Domain::Diabetes, Domain::Cardiovascular]);
        assert_eq!(fused.modalities_used, BTreeSet::from([DataModality::Labs]));
        assert!(fused.skipped_domains.is_empty());
        assert_eq!(fused.prediction_type, PredictionType::MultiModalFusion);
    }

    #[test]
    fn test_malformed_domain_is_skipped() {
        let bundle = BundleBuilder::new()
            .lab(LabType::A1c, 6.8, 0)
            .lab(LabType::Ldl, -40.0, 0)
            .build();
        let fused = FusionEngine::default().assess(&bundle);
        assert_eq!(fused.domains(), vec![Domain::Diabetes]);
        assert_eq!(fused.skipped_domains.len(), 1);
        assert_eq!(fused.skipped_domains[0].domain, Domain::Cardiovascular);
        // 0.85 × 0.9
        assert_eq!(fused.confidence, 0.765);
    }

    #[test]
    fn test_panicking_scorer_does_not_abort() {
        let mut scorers = default_scorers();
        scorers.retain(|s| s.domain() != Domain::Imaging);
        scorers.push(Box::new(PanickingScorer));
        let engine = FusionEngine::with_scorers(EngineConfig::default(), scorers).unwrap();

        let mut bundle = labs_only_bundle();
        bundle.imaging.push(medifuse_common::ImagingRecord::new(ImagingModality::Ct, "CHEST", Some(0.3)));
        let fused = engine.assess(&bundle);

        assert_eq!(fused.domains(), vec![Domain::Diabetes, Domain::Cardiovascular]);
        assert_eq!(fused.skipped_domains[0].domain, Domain::Imaging);
        assert_eq!(fused.skipped_domains[0].reason, "Scorer for imaging panicked");
    }

    #[test]
    fn test_duplicate_domain_rejected() {
        let mut scorers = default_scorers();
        scorers.push(Box::new(PanickingScorer));
        assert!(FusionEngine::with_scorers(EngineConfig::default(), scorers).is_err());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let bundle = full_bundle();
        let parallel = FusionEngine::default().assess(&bundle);
        let mut config = EngineConfig::default();
        config.execution.parallel = false;
        let sequential = FusionEngine::new(config).unwrap().assess(&bundle);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_lists_are_capped() {
        let fused = FusionEngine::default().assess(&full_bundle());
        assert!(fused.recommendations.len() <= 10);
        assert!(fused.contributing_factors.len() <= 10);
        let unique: HashSet<&String> = fused.recommendations.iter().collect();
        assert_eq!(unique.len(), fused.recommendations.len());
    }

    #[test]
    fn test_weights_come_from_config() {
        let bundle = BundleBuilder::new().lab(LabType::A1c, 5.5, 0).build();
        let base = FusionEngine::default().assess(&bundle);

        let mut config = EngineConfig::default();
        config.fusion.weights.diabetes = 2.0;
        config.fusion.weights.cardiovascular = 2.0;
        let heavy = FusionEngine::new(config).unwrap().assess(&bundle);
        assert!(heavy.overall_risk_score > base.overall_risk_score);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.fusion.max_blend = 0.9;
        assert!(FusionEngine::new(config).is_err());
    }
}
