use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Project-local settings read from `.tender/config.yaml`.
///
/// The file is optional; every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Agent runner queried for `agent list`.
    #[serde(default = "default_opencode_bin")]
    pub opencode_bin: String,
    /// Repository-hosting CLI used to dispatch workflows.
    #[serde(default = "default_gh_bin")]
    pub gh_bin: String,
    /// Bound applied to every external command.
    #[serde(default = "default_external_timeout_secs")]
    pub external_timeout_secs: u64,
}

fn default_opencode_bin() -> String {
    "opencode".to_string()
}

fn default_gh_bin() -> String {
    "gh".to_string()
}

fn default_external_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            opencode_bin: default_opencode_bin(),
            gh_bin: default_gh_bin(),
            external_timeout_secs: default_external_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn external_timeout(&self) -> Duration {
        Duration::from_secs(self.external_timeout_secs.max(1))
    }
}
