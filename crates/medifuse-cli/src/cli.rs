use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use medifuse_anomaly::AnomalyDetector;
use medifuse_common::{EngineConfig, PatientBundle};
use medifuse_fusion::FusionEngine;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "medifuse", version, about = "Multi-modal health risk assessment")]
pub struct Cli {
    /// Engine config file (TOML, YAML or JSON). Overrides MEDIFUSE_CONFIG.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print single-line JSON.
    #[arg(long, global = true, default_value_t = false)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fuse every available domain into one assessment.
    Assess {
        /// Patient bundle JSON file.
        bundle: PathBuf,
    },
    /// Lab anomalies and trends.
    Anomalies {
        /// Patient bundle JSON file.
        bundle: PathBuf,
    },
}

pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::from_path(p)
            .with_context(|| format!("Failed to load config from {}", p.display())),
        None => EngineConfig::load().context("Failed to resolve engine config"),
    }
}

pub fn read_bundle(path: &Path) -> Result<PatientBundle> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read bundle {}", path.display()))?;
    parse_bundle(&content).with_context(|| format!("Invalid bundle {}", path.display()))
}

pub fn parse_bundle(content: &str) -> Result<PatientBundle> {
    Ok(serde_json::from_str(content)?)
}

pub fn render<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(out)
}

/// Execute a parsed command and return the JSON to print.
pub fn run(cli: &Cli) -> Result<String> {
    match &cli.command {
        Commands::Assess { bundle } => {
            let config = load_config(cli.config.as_deref())?;
            let engine = FusionEngine::new(config).context("Invalid engine config")?;
            let bundle = read_bundle(bundle)?;
            info!(
                labs = bundle.labs.len(),
                imaging = bundle.imaging.len(),
                variants = bundle.genomics.len(),
                notes = bundle.clinical_notes.len(),
                "Assessing bundle"
            );
            render(&engine.assess(&bundle), cli.compact)
        }
        Commands::Anomalies { bundle } => {
            let bundle = read_bundle(bundle)?;
            render(&AnomalyDetector::new().detect_bundle(&bundle), cli.compact)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medifuse_test_utils::{bundle_json, full_bundle};

    #[test]
    fn test_parse_assess_with_global_flags() {
        let cli = Cli::try_parse_from(["medifuse", "assess", "patient.json", "--compact"]).unwrap();
        assert!(cli.compact);
        assert!(cli.config.is_none());
        assert!(matches!(cli.command, Commands::Assess { .. }));
    }

    #[test]
    fn test_parse_anomalies_with_config() {
        let cli = Cli::try_parse_from(["medifuse", "--config", "engine.yaml", "anomalies", "p.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("engine.yaml")));
        assert!(matches!(cli.command, Commands::Anomalies { .. }));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["medifuse"]).is_err());
    }

    #[test]
    fn test_example_config_is_valid() {
        let config = EngineConfig::from_toml_str(include_str!("../../../medifuse.example.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_bundle_json_parses() {
        let bundle = parse_bundle(&bundle_json(&full_bundle())).unwrap();
        assert_eq!(bundle, full_bundle());
    }

    #[test]
    fn test_minimal_bundle_parses() {
        let bundle = parse_bundle(r#"{"labs":[{"lab_type":"a1c","value":6.1,"recorded_at":"2024-05-01T00:00:00Z"}]}"#).unwrap();
        assert_eq!(bundle.labs.len(), 1);
        assert!(bundle.imaging.is_empty());
    }

    #[test]
    fn test_compact_render_is_single_line() {
        let out = render(&FusionEngine::default().assess(&full_bundle()), true).unwrap();
        assert!(!out.contains('\n'));
    }

    #[test]
    fn test_missing_bundle_file_reports_path() {
        let err = read_bundle(Path::new("/nonexistent/bundle.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bundle.json"));
    }
}
