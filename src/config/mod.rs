//! Configuration for the shell-surface engine
//!
//! Loaded from a TOML file by the embedding compositor. Only policy knobs
//! the engine itself consumes live here; transport, rendering and logging
//! setup belong to the host process.


use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ShellConfig {
    /// Client liveness observation
    #[serde(default)]
    pub liveness: LivenessConfig,
}

/// Ping/pong observation settings.
///
/// The engine never disconnects anyone; this threshold only controls which
/// clients [`unresponsive_clients`](crate::engine::ShellEngine::unresponsive_clients)
/// reports to the external connection-health policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LivenessConfig {
    /// An outstanding ping older than this many milliseconds marks the
    /// client unresponsive.
    #[serde(default = "LivenessConfig::default_unresponsive_after_ms")]
    pub unresponsive_after_ms: u64,
}

impl LivenessConfig {
    fn default_unresponsive_after_ms() -> u64 {
        5000
    }

    pub fn unresponsive_after(&self) -> Duration {
        Duration::from_millis(self.unresponsive_after_ms)
    }
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            unresponsive_after_ms: Self::default_unresponsive_after_ms(),
        }
    }
}

impl ShellConfig {
    /// Loads configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: ShellConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ShellConfig =
            toml::from_str(content).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.liveness.unresponsive_after_ms == 0 {
            bail!("liveness.unresponsive_after_ms must be greater than zero");
        }
        Ok(())
    }
}
