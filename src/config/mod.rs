//! Configuration system for dockdash

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Global application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub display: DisplayConfig,
    pub docker: DockerConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dockdash").join("config.toml"))
    }

    /// Load `path` if given, else the default file when it exists, else defaults
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Bound of each signal queue
    pub queue_capacity: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { queue_capacity: 16 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub theme: String,
    /// Largest first-row index the list can scroll to
    pub max_rows: usize,
    pub summary_interval_ms: u64,
}

impl DisplayConfig {
    pub fn summary_interval(&self) -> Duration {
        Duration::from_millis(self.summary_interval_ms.max(1))
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: "tokyo-night".to_string(),
            max_rows: 100,
            summary_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DockerConfig {
    pub endpoint: Option<String>,
    pub stats_interval: u64,
    pub reconnect_delay: u64,
}

impl DockerConfig {
    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval.max(1))
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay)
    }
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            stats_interval: 2,
            reconnect_delay: 3,
        }
    }
}
