//! Engine configuration
//!
//! Loaded from the JSON file named by `FERRUMSET_CONFIG`. Missing fields take
//! their defaults, and a missing variable means an all-default configuration.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Environment variable holding the configuration file path
pub const ENV_VAR: &str = "FERRUMSET_CONFIG";

/// Runtime configuration for the engine and the console
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Initial capacity of the key-space map
    pub initial_capacity: usize,

    /// SSCAN COUNT used when the client gives none
    pub scan_count: usize,

    /// Fixed seed for SPOP / SRANDMEMBER, entropy when unset
    pub rng_seed: Option<u64>,

    /// tracing filter directive, overridden by RUST_LOG
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            initial_capacity: 1024,
            scan_count: crate::set::DEFAULT_SCAN_COUNT,
            rng_seed: None,
            log_filter: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load the configuration named by `FERRUMSET_CONFIG`, or the defaults
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var_os(ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Load the configuration from a JSON file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_json(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let config: EngineConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.scan_count == 0 {
            bail!("scan_count must be greater than zero");
        }
        Ok(())
    }
}
