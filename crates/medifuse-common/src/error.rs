use thiserror::Error;

use crate::assessment::Domain;

#[derive(Debug, Error)]
pub enum MedifuseError {
    #[error("Malformed {domain} input: {reason}")]
    MalformedInput { domain: Domain, reason: String },

    #[error("Scorer for {domain} panicked")]
    ScorerPanicked { domain: Domain },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MedifuseError {
    pub fn malformed(domain: Domain, reason: impl Into<String>) -> Self {
        MedifuseError::MalformedInput { domain, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, MedifuseError>;
