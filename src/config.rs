//! Session configuration loaded from YAML.
//!
//! The config controls where artifacts land, whether stale output is
//! cleared, how long grant polling waits, and which sources are
//! disabled by name. Collection behavior itself lives in the source
//! implementations; the config only tunes the session around them.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::authorization::GrantPolicy;
use crate::constants::{GRANT_POLL_INTERVAL_MS, GRANT_POLL_MAX_CHECKS};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionConfig {
    pub version: String,
    pub description: String,
    /// Output directory for collected artifacts. `None` defers to the
    /// CLI flag or the platform temp directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Remove a pre-existing output directory before collecting.
    #[serde(default = "default_clear_output")]
    pub clear_output: bool,
    #[serde(default = "default_poll_interval_ms")]
    pub grant_poll_interval_ms: u64,
    #[serde(default = "default_poll_max_checks")]
    pub grant_poll_max_checks: u32,
    /// Source ids excluded from the run. Unknown ids are ignored.
    #[serde(default)]
    pub disabled_sources: Vec<String>,
}

fn default_clear_output() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    GRANT_POLL_INTERVAL_MS
}

fn default_poll_max_checks() -> u32 {
    GRANT_POLL_MAX_CHECKS
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            version: "1.0".to_string(),
            description: "Default collection session".to_string(),
            output_dir: None,
            clear_output: default_clear_output(),
            grant_poll_interval_ms: default_poll_interval_ms(),
            grant_poll_max_checks: default_poll_max_checks(),
            disabled_sources: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: SessionConfig =
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Grant polling knobs as a policy the runner understands.
    pub fn grant_policy(&self) -> GrantPolicy {
        GrantPolicy::new(
            Duration::from_millis(self.grant_poll_interval_ms),
            self.grant_poll_max_checks,
        )
    }
}

/// Load a configuration file or create a default one.
///
/// With a path that exists, the file is parsed. With a path that does
/// not exist yet, a default config is written there so the operator has
/// something to edit. With no path at all, the in-memory default is
/// used and nothing touches disk.
pub fn load_or_create_config(config_path: Option<&Path>) -> Result<SessionConfig> {
    match config_path {
        Some(path) => {
            if path.exists() {
                SessionConfig::from_yaml_file(path)
            } else {
                info!("Config {} not found, creating default", path.display());
                let default_config = SessionConfig::default();
                default_config.save_to_yaml_file(path)?;
                Ok(default_config)
            }
        }
        None => {
            info!("No config path provided, using default configuration");
            Ok(SessionConfig::default())
        }
    }
}
