//! Engine configuration.
//!
//! Fusion weights and caps are empirical constants; they are kept configurable
//! rather than derived. Loaded from TOML, YAML or JSON; every field has a default,
//! so an empty file yields the stock engine.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::assessment::Domain;
use crate::error::{MedifuseError, Result};

/// Env var naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "MEDIFUSE_CONFIG";
/// Config file looked up in the working directory when the env var is unset.
pub const DEFAULT_CONFIG_FILE: &str = "medifuse.toml";

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub fusion: FusionConfig,

    #[serde(default)]
    pub execution: ExecutionConfig,
}

// ── Domain weights ───────────────────────────────────────────────────────────

/// Per-domain multipliers applied to each risk score before aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainWeights {
    #[serde(default = "default_diabetes_weight")]
    pub diabetes: f64,
    #[serde(default = "default_cardiovascular_weight")]
    pub cardiovascular: f64,
    #[serde(default = "default_unit_weight")]
    pub imaging: f64,
    #[serde(default = "default_unit_weight")]
    pub clinical_notes: f64,
    #[serde(default = "default_genomics_weight")]
    pub genomics: f64,
}

fn default_diabetes_weight() -> f64 { 1.2 }
fn default_cardiovascular_weight() -> f64 { 1.1 }
fn default_unit_weight() -> f64 { 1.0 }
fn default_genomics_weight() -> f64 { 1.3 }

impl Default for DomainWeights {
    fn default() -> Self {
        Self {
            diabetes: default_diabetes_weight(),
            cardiovascular: default_cardiovascular_weight(),
            imaging: default_unit_weight(),
            clinical_notes: default_unit_weight(),
            genomics: default_genomics_weight(),
        }
    }
}

impl DomainWeights {
    pub fn weight(&self, domain: Domain) -> f64 {
        match domain {
            Domain::Diabetes       => self.diabetes,
            Domain::Cardiovascular => self.cardiovascular,
            Domain::Imaging        => self.imaging,
            Domain::ClinicalNotes  => self.clinical_notes,
            Domain::Genomics       => self.genomics,
        }
    }

    /// All weights must be finite and strictly positive.
    pub fn validate(&self) -> bool {
        Domain::ALL
            .iter()
            .map(|d| self.weight(*d))
            .all(|w| w.is_finite() && w > 0.0)
    }
}

// ── Fusion ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionConfig {
    #[serde(default)]
    pub weights: DomainWeights,

    /// Share of the mean weighted score in the overall blend.
    #[serde(default = "default_mean_blend")]
    pub mean_blend: f64,

    /// Share of the maximum weighted score in the overall blend.
    #[serde(default = "default_max_blend")]
    pub max_blend: f64,

    #[serde(default = "default_overall_cap")]
    pub overall_cap: f64,

    /// Overall score when no scorer ran.
    #[serde(default = "default_empty_score")]
    pub empty_score: f64,

    #[serde(default = "default_list_cap")]
    pub max_recommendations: usize,

    #[serde(default = "default_list_cap")]
    pub max_factors: usize,

    /// Confidence multiplier applied per skipped domain.
    #[serde(default = "default_skip_penalty")]
    pub skipped_domain_penalty: f64,
}

fn default_mean_blend() -> f64 { 0.6 }
fn default_max_blend() -> f64 { 0.4 }
fn default_overall_cap() -> f64 { 0.95 }
fn default_empty_score() -> f64 { 0.1 }
fn default_list_cap() -> usize { 10 }
fn default_skip_penalty() -> f64 { 0.9 }

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            weights: DomainWeights::default(),
            mean_blend: default_mean_blend(),
            max_blend: default_max_blend(),
            overall_cap: default_overall_cap(),
            empty_score: default_empty_score(),
            max_recommendations: default_list_cap(),
            max_factors: default_list_cap(),
            skipped_domain_penalty: default_skip_penalty(),
        }
    }
}

impl FusionConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.weights.validate() {
            return Err(MedifuseError::Config(
                "domain weights must be finite and positive".to_string(),
            ));
        }
        if self.mean_blend < 0.0 || self.max_blend < 0.0 {
            return Err(MedifuseError::Config("blend factors must be non-negative".to_string()));
        }
        if (self.mean_blend + self.max_blend - 1.0).abs() > 1e-6 {
            return Err(MedifuseError::Config(format!(
                "mean_blend + max_blend must equal 1.0 (got {})",
                self.mean_blend + self.max_blend
            )));
        }
        if !(0.0..=1.0).contains(&self.overall_cap) || !(0.0..=1.0).contains(&self.empty_score) {
            return Err(MedifuseError::Config(
                "overall_cap and empty_score must lie in [0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.skipped_domain_penalty) {
            return Err(MedifuseError::Config(
                "skipped_domain_penalty must lie in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

// ── Execution ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Run domain scorers on the rayon pool instead of sequentially.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

fn default_true() -> bool { true }

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

// ── Loading ──────────────────────────────────────────────────────────────────

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.fusion.validate()?;
        Ok(config)
    }

    /// Load from YAML file
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.fusion.validate()?;
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.fusion.validate()?;
        Ok(config)
    }

    /// Load by file extension; anything that is not YAML or JSON is read as TOML.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(path),
            Some("json") => Self::from_json(path),
            _ => {
                let content = std::fs::read_to_string(path)?;
                Self::from_toml_str(&content)
            }
        }
    }

    /// Resolve configuration: `MEDIFUSE_CONFIG`, then `medifuse.toml`, then defaults.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            info!("Loading engine config from {} ({})", path, CONFIG_ENV_VAR);
            return Self::from_path(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            info!("Loading engine config from {}", DEFAULT_CONFIG_FILE);
            return Self::from_path(local);
        }
        debug!("No config file found; using built-in defaults");
        Ok(Self::default())
    }
}
