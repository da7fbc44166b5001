//! Fused assessments over complete patient bundles.

use medifuse_common::{DataModality, Domain, EngineConfig, PatientBundle};
use medifuse_fusion::FusionEngine;
use medifuse_test_utils::{bundle_json, full_bundle, labs_only_bundle};
use pretty_assertions::assert_eq;

#[test]
fn test_full_bundle_runs_every_domain() {
    let fused = FusionEngine::default().assess(&full_bundle());
    assert_eq!(fused.domains(), Domain::ALL.to_vec());
    assert_eq!(fused.modalities_used.len(), 4);
    assert!(fused.modalities_used.contains(&DataModality::Genomics));
    assert!(fused.skipped_domains.is_empty());
    assert!((0.0..=0.95).contains(&fused.overall_risk_score));

    let clauses: Vec<&str> = fused.summary.split(" | ").collect();
    assert_eq!(clauses.len(), 5);
    assert!(clauses[0].starts_with("Diabetes risk: "));
    assert!(clauses[1].ends_with("% 10-year risk"));
    assert!(clauses[2].starts_with("Imaging: "));
    assert_eq!(clauses[3], "Clinical notes: stable trend, 2 active conditions");
    assert_eq!(clauses[4], "Genomics: 1 pathogenic variants");
}

#[test]
fn test_labs_only_modalities_serialise_as_labs() {
    let fused = FusionEngine::default().assess(&labs_only_bundle());
    let json = serde_json::to_value(&fused).unwrap();
    assert_eq!(json["modalities_used"], serde_json::json!(["labs"]));
    let keys: Vec<&String> = json["domain_assessments"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["cardiovascular", "diabetes"]);
}

#[test]
fn test_repeat_assessment_is_byte_identical() {
    let engine = FusionEngine::default();
    let bundle = full_bundle();
    let first = serde_json::to_vec(&engine.assess(&bundle)).unwrap();
    let second = serde_json::to_vec(&engine.assess(&bundle)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_bundle_survives_json_boundary() {
    let bundle = full_bundle();
    let parsed: PatientBundle = serde_json::from_str(&bundle_json(&bundle)).unwrap();
    let engine = FusionEngine::default();
    assert_eq!(engine.assess(&parsed), engine.assess(&bundle));
}

#[test]
fn test_shared_engine_across_threads() {
    let engine = FusionEngine::new(EngineConfig::default()).unwrap();
    let bundle = full_bundle();
    let expected = engine.assess(&bundle);
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| engine.assess(&bundle))).collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_fused_level_matches_score_bucket() {
    let fused = FusionEngine::default().assess(&full_bundle());
    assert_eq!(fused.overall_risk_level, medifuse_fusion::overall_level(fused.overall_risk_score));
}
