//! Hereditary risk from classified genomic variants.
//!
//! Input variants are never re-classified in place; the scorer reports a
//! read-only [`AnnotatedVariant`] per input carrying its effective tier.

use std::collections::BTreeSet;

use medifuse_common::assessment::{
    AnnotatedVariant, DomainDetails, GenomicsDetails, HereditarySyndrome, MODEL_VERSION,
};
use medifuse_common::util::{dedup_capped, round3};
use medifuse_common::{
    AcmgClassification, DataModality, Domain, Factor, GenomicVariant, Impact, PatientBundle,
    PredictionType, Result, RiskAssessment, RiskLevel,
};
use medifuse_reference::{acmg_tier, gene_info, is_actionable_tier, syndromes};
use serde::{Deserialize, Serialize};

use crate::scorer::{FromBundle, Scorer};

const CONFIDENCE: f64 = 0.85;
const EMPTY_CONFIDENCE: f64 = 0.9;
const MAX_RECOMMENDATIONS: usize = 8;

const HIGH_FLOOR: f64 = 0.7;
const MODERATE_FLOOR: f64 = 0.4;
const MODERATE_CEILING: f64 = 0.69;
const VUS_SCORE: f64 = 0.25;
const BASELINE_SCORE: f64 = 0.1;
const SCORE_CAP: f64 = 0.95;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenomicsInput {
    pub variants: Vec<GenomicVariant>,
}

impl FromBundle for GenomicsInput {
    fn from_bundle(bundle: &PatientBundle) -> Result<Self> {
        for variant in &bundle.genomics {
            variant.validate()?;
        }
        Ok(Self { variants: bundle.genomics.clone() })
    }
}

/// Annotate one variant against the gene table.
/// Pathogenic calls on genes without known associations count as VUS.
pub fn annotate(variant: &GenomicVariant) -> AnnotatedVariant {
    let info = gene_info(&variant.gene);
    let effective = match (info, variant.classification) {
        (None, AcmgClassification::Pathogenic | AcmgClassification::LikelyPathogenic) => {
            AcmgClassification::Vus
        }
        (_, c) => c,
    };
    let actionable = is_actionable_tier(effective) && info.is_some_and(|g| !g.conditions.is_empty());

    let mut conditions = variant.associated_conditions.clone();
    if actionable {
        if let Some(g) = info {
            conditions.extend(g.conditions.iter().map(|c| c.to_string()));
        }
    }

    AnnotatedVariant {
        gene: info.map_or_else(|| variant.gene.trim().to_string(), |g| g.symbol.to_string()),
        variant: variant.variant.clone(),
        classification: variant.classification,
        effective_classification: effective,
        acmg_tier: acmg_tier(effective),
        known_gene: info.is_some(),
        actionable,
        inheritance: info.map(|g| g.inheritance),
        cancer_syndrome: info.and_then(|g| g.syndrome).map(str::to_string),
        lifetime_risk_increase: info.map(|g| g.lifetime_risk_increase),
        conditions,
    }
}

/// Syndromes whose gene panel intersects the pathogenic / likely-pathogenic genes.
pub fn identify_syndromes(annotated: &[AnnotatedVariant]) -> Vec<HereditarySyndrome> {
    let flagged: BTreeSet<&str> = annotated
        .iter()
        .filter(|v| is_actionable_tier(v.effective_classification))
        .map(|v| v.gene.as_str())
        .collect();

    syndromes()
        .iter()
        .filter_map(|s| {
            let matched: Vec<String> = s
                .genes
                .iter()
                .filter(|g| flagged.contains(**g))
                .map(|g| g.to_string())
                .collect();
            if matched.is_empty() {
                return None;
            }
            Some(HereditarySyndrome {
                name: s.name.to_string(),
                code: s.code.to_string(),
                confidence: if matched.len() >= 2 { 0.9 } else { 0.75 },
                matched_genes: matched,
            })
        })
        .collect()
}

fn pathogenicity(variant: &GenomicVariant) -> f64 {
    variant.pathogenicity_score.unwrap_or(0.0)
}

fn max_of<I: Iterator<Item = f64>>(values: I) -> f64 {
    values.fold(0.0, f64::max)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenomicsScorer;

impl Scorer for GenomicsScorer {
    type Input = GenomicsInput;

    const DOMAIN: Domain = Domain::Genomics;

    fn score(&self, input: &GenomicsInput) -> RiskAssessment {
        if input.variants.is_empty() {
            return empty_assessment();
        }

        let pairs: Vec<(&GenomicVariant, AnnotatedVariant)> =
            input.variants.iter().map(|v| (v, annotate(v))).collect();
        let with_class = |c: AcmgClassification| {
            pairs.iter().filter(move |(_, a)| a.effective_classification == c)
        };

        let pathogenic_count = with_class(AcmgClassification::Pathogenic).count();
        let likely_count = with_class(AcmgClassification::LikelyPathogenic).count();
        let vus_count = with_class(AcmgClassification::Vus).count();

        let max_pathogenicity = max_of(pairs.iter().map(|(v, _)| pathogenicity(v)));

        let (risk_score, risk_level) = if pathogenic_count > 0 {
            let floor = max_of(
                with_class(AcmgClassification::Pathogenic)
                    .map(|(v, a)| a.lifetime_risk_increase.unwrap_or(0.0).max(pathogenicity(v))),
            );
            (floor.max(HIGH_FLOOR).min(SCORE_CAP), RiskLevel::High)
        } else if likely_count > 0 {
            let lp_max = max_of(with_class(AcmgClassification::LikelyPathogenic).map(|(v, _)| pathogenicity(v)));
            ((lp_max * 0.8).max(MODERATE_FLOOR).min(MODERATE_CEILING), RiskLevel::Moderate)
        } else if vus_count > 0 {
            (VUS_SCORE, RiskLevel::Low)
        } else {
            (BASELINE_SCORE, RiskLevel::Low)
        };

        let associated: BTreeSet<String> = pairs
            .iter()
            .flat_map(|(_, a)| a.conditions.iter().cloned())
            .collect();
        let cancer_related: BTreeSet<String> = associated
            .iter()
            .filter(|c| c.to_lowercase().contains("cancer"))
            .cloned()
            .collect();
        let cancer_risk = (cancer_related.len() as f64 * 0.15 + max_pathogenicity * 0.5).min(0.95);

        let factors = pairs
            .iter()
            .filter(|(_, a)| a.actionable)
            .map(|(_, a)| {
                let conditions: Vec<&str> = a.conditions.iter().map(String::as_str).collect();
                Factor::new(
                    &format!("{} Variant", a.gene),
                    a.variant.clone().unwrap_or_else(|| a.effective_classification.to_string()),
                    if a.effective_classification == AcmgClassification::Pathogenic {
                        Impact::High
                    } else {
                        Impact::Moderate
                    },
                    &format!("{} variant associated with {}", a.effective_classification, conditions.join(", ")),
                )
            })
            .collect();

        let mut recommendations: Vec<String> = Vec::new();
        if pathogenic_count > 0 {
            recommendations.push("Genetic counseling strongly recommended".to_string());
            recommendations.push("Discuss screening options with specialist".to_string());
        }
        for (_, a) in pairs.iter().filter(|(_, a)| a.actionable) {
            if let Some(info) = gene_info(&a.gene) {
                recommendations.extend(info.screening.iter().map(|s| s.to_string()));
            }
        }
        if !cancer_related.is_empty() {
            recommendations.push("Enhanced cancer surveillance may be indicated".to_string());
        }
        if likely_count > 0 {
            recommendations.push("Consider confirmatory genetic testing".to_string());
        }
        if vus_count > 0 {
            recommendations.push("Periodic reclassification review of uncertain variants".to_string());
        }

        let annotated: Vec<AnnotatedVariant> = pairs.into_iter().map(|(_, a)| a).collect();
        let hereditary_syndromes = identify_syndromes(&annotated);

        RiskAssessment {
            prediction_type: PredictionType::GenomicsRisk,
            risk_score: round3(risk_score),
            risk_level,
            confidence: CONFIDENCE,
            contributing_factors: factors,
            recommendations: dedup_capped(recommendations, MAX_RECOMMENDATIONS),
            modalities_used: BTreeSet::from([DataModality::Genomics]),
            details: DomainDetails::Genomics(GenomicsDetails {
                total_variants: annotated.len(),
                annotated_variants: annotated,
                hereditary_syndromes,
                pathogenic_count,
                likely_pathogenic_count: likely_count,
                vus_count,
                cancer_risk_score: round3(cancer_risk),
                associated_conditions: associated,
                cancer_related_conditions: cancer_related,
                message: None,
            }),
            model_version: MODEL_VERSION.to_string(),
        }
    }
}

fn empty_assessment() -> RiskAssessment {
    RiskAssessment {
        prediction_type: PredictionType::GenomicsRisk,
        risk_score: BASELINE_SCORE,
        risk_level: RiskLevel::Low,
        confidence: EMPTY_CONFIDENCE,
        contributing_factors: Vec::new(),
        recommendations: Vec::new(),
        modalities_used: BTreeSet::from([DataModality::Genomics]),
        details: DomainDetails::Genomics(GenomicsDetails {
            annotated_variants: Vec::new(),
            hereditary_syndromes: Vec::new(),
            pathogenic_count: 0,
            likely_pathogenic_count: 0,
            vus_count: 0,
            total_variants: 0,
            cancer_risk_score: 0.0,
            associated_conditions: BTreeSet::new(),
            cancer_related_conditions: BTreeSet::new(),
            message: Some("No genetic variants provided for analysis".to_string()),
        }),
        model_version: MODEL_VERSION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(a: &RiskAssessment) -> &GenomicsDetails {
        match &a.details {
            DomainDetails::Genomics(d) => d,
            other => panic!("unexpected details {other:?}"),
        }
    }

    fn score(variants: Vec<GenomicVariant>) -> RiskAssessment {
        GenomicsScorer.score(&GenomicsInput { variants })
    }

    #[test]
    fn test_empty_variants() {
        let a = score(vec![]);
        assert_eq!(a.risk_score, 0.1);
        assert_eq!(a.risk_level, RiskLevel::Low);
        assert!(details(&a).hereditary_syndromes.is_empty());
        assert_eq!(a.confidence, EMPTY_CONFIDENCE);
    }

    #[test]
    fn test_pathogenic_brca1_reports_hboc() {
        let a = score(vec![GenomicVariant::new("BRCA1", AcmgClassification::Pathogenic)]);
        assert_eq!(a.risk_level, RiskLevel::High);
        assert_eq!(a.risk_score, 0.8);
        let d = details(&a);
        assert_eq!(d.hereditary_syndromes.len(), 1);
        assert_eq!(d.hereditary_syndromes[0].name, "Hereditary Breast and Ovarian Cancer Syndrome");
        assert_eq!(d.hereditary_syndromes[0].confidence, 0.75);
        assert_eq!(a.recommendations[0], "Genetic counseling strongly recommended");
        assert!(d.cancer_related_conditions.contains("Breast Cancer"));
    }

    #[test]
    fn test_two_panel_genes_raise_syndrome_confidence() {
        let a = score(vec![
            GenomicVariant::new("BRCA1", AcmgClassification::Pathogenic),
            GenomicVariant::new("BRCA2", AcmgClassification::LikelyPathogenic),
        ]);
        let syndrome = &details(&a).hereditary_syndromes[0];
        assert_eq!(syndrome.matched_genes, vec!["BRCA1", "BRCA2"]);
        assert_eq!(syndrome.confidence, 0.9);
    }

    #[test]
    fn test_likely_pathogenic_only_is_moderate() {
        let a = score(vec![
            GenomicVariant::new("MLH1", AcmgClassification::LikelyPathogenic).with_score(0.95),
        ]);
        assert_eq!(a.risk_level, RiskLevel::Moderate);
        assert_eq!(a.risk_score, 0.69);
        let low = score(vec![GenomicVariant::new("MLH1", AcmgClassification::LikelyPathogenic)]);
        assert_eq!(low.risk_score, 0.4);
    }

    #[test]
    fn test_vus_only_is_low() {
        let a = score(vec![GenomicVariant::new("ATM", AcmgClassification::Vus)]);
        assert_eq!(a.risk_level, RiskLevel::Low);
        assert_eq!(a.risk_score, 0.25);
        assert!(details(&a).hereditary_syndromes.is_empty());
    }

    #[test]
    fn test_unknown_gene_counts_as_vus() {
        let a = score(vec![GenomicVariant::new("FAKE1", AcmgClassification::Pathogenic)]);
        let d = details(&a);
        assert_eq!(d.pathogenic_count, 0);
        assert_eq!(d.vus_count, 1);
        assert!(!d.annotated_variants[0].actionable);
        assert_eq!(d.annotated_variants[0].classification, AcmgClassification::Pathogenic);
        assert_eq!(d.annotated_variants[0].effective_classification, AcmgClassification::Vus);
        assert_eq!(a.risk_score, 0.25);
    }

    #[test]
    fn test_benign_only_is_baseline() {
        let a = score(vec![GenomicVariant::new("BRCA2", AcmgClassification::Benign)]);
        assert_eq!(a.risk_score, 0.1);
        assert!(a.contributing_factors.is_empty());
    }

    #[test]
    fn test_recommendations_are_capped() {
        let genes = ["BRCA1", "BRCA2", "TP53", "MLH1", "APC", "PTEN", "RET"];
        let variants = genes
            .iter()
            .map(|g| GenomicVariant::new(g, AcmgClassification::Pathogenic))
            .collect();
        let a = score(variants);
        assert!(a.recommendations.len() <= MAX_RECOMMENDATIONS);
        let unique: BTreeSet<&String> = a.recommendations.iter().collect();
        assert_eq!(unique.len(), a.recommendations.len());
        assert_eq!(a.risk_score, 0.9);
    }
}
