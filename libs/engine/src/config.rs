//! Engine configuration
//!
//! TOML-backed settings with production defaults. The fee schedule is
//! fixed per engine instance; there is deliberately no per-pool fee-tier
//! machinery.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sluice_amm::Fee;
use std::path::Path;
use tracing::info;

/// Environment variable naming an alternate config file.
pub const CONFIG_PATH_ENV: &str = "SLUICE_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Swap fee applied by every pool.
    pub fee: Fee,
    /// Capacity of the bounded pool-event channel.
    pub event_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fee: Fee::default(),
            event_buffer: 1024,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.fee.is_valid() {
            bail!(
                "invalid fee schedule {}/{}: numerator must be below a non-zero denominator",
                self.fee.numerator,
                self.fee.denominator
            );
        }
        if self.event_buffer == 0 {
            bail!("event_buffer must be non-zero");
        }
        Ok(())
    }
}

/// Load configuration from a TOML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading engine config from {}", path.display()))?;
    let config: EngineConfig =
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    config.validate()?;
    info!(path = %path.display(), fee = ?config.fee, "loaded engine config");
    Ok(config)
}

/// Config from `SLUICE_CONFIG` when set, defaults otherwise.
pub fn load_from_env() -> Result<EngineConfig> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => load_config(path),
        Err(_) => Ok(EngineConfig::default()),
    }
}
