use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Host serving the PDA/android data feeds (local weather, rainfall
/// nowcast, UV index, forecast).
pub const DEFAULT_PDA_BASE_URL: &str = "http://pda.weather.gov.hk/";

/// Host serving the warning-summary feeds.
pub const DEFAULT_WEB_BASE_URL: &str = "http://www.weather.gov.hk/";

/// Top-level configuration stored on disk. Every field has a production
/// default, so an absent config file means "use the live feeds".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pda_base_url: String,
    pub web_base_url: String,

    /// Upper bound on each outbound request. The feeds have no retry, so
    /// this is the only thing keeping a call from hanging.
    pub timeout_secs: u64,

    /// Coverage thresholds for the two grid indexes, in kilometres.
    pub local_coverage_km: f64,
    pub rainfall_coverage_km: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pda_base_url: DEFAULT_PDA_BASE_URL.to_string(),
            web_base_url: DEFAULT_WEB_BASE_URL.to_string(),
            timeout_secs: 10,
            local_coverage_km: 10.0,
            rainfall_coverage_km: 10.0,
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("hk", "hko", "hko-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
