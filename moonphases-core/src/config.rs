use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use url::Url;

pub const DEFAULT_CITY: &str = "San Francisco, CA";
pub const DEFAULT_ADDR: &str = "0.0.0.0:8001";
pub const DEFAULT_BASE_URL: &str = "http://api.usno.navy.mil/rstt/oneday";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// What to do when the provider sets `"error": true` in its response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Keep going and map whatever data came back.
    #[default]
    Ignore,
    /// Fail the request with `PhaseError::ProviderReported`.
    Reject,
}

/// Outbound provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub error_policy: ErrorPolicy,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            error_policy: ErrorPolicy::default(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// city = "Seattle, WA"
/// addr = "0.0.0.0:8001"
/// log_level = "debug"
///
/// [provider]
/// timeout_secs = 3
/// error_policy = "reject"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub city: String,
    pub addr: String,
    pub log_level: String,
    pub provider: ProviderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            city: DEFAULT_CITY.to_string(),
            addr: DEFAULT_ADDR.to_string(),
            log_level: "info".to_string(),
            provider: ProviderConfig::default(),
        }
    }
}

/// Read-only settings shared by every request handler.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub city: String,
    pub base_url: Url,
    pub timeout: Duration,
    pub error_policy: ErrorPolicy,
}

impl Config {
    /// Load config from `path`, or from the platform config directory when no
    /// path is given. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file_path()?,
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path` (or the platform default), creating parent directories as needed.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file_path()?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the default config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "moonphases", "moonphases")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Validate and freeze the parts of the config the request path needs.
    pub fn service_config(&self) -> Result<ServiceConfig> {
        let city = self.city.trim();
        if city.is_empty() {
            bail!("No city configured.\nHint: pass `--city \"<City>, <State>\"` or run `moonphases configure`.");
        }

        let base_url = Url::parse(&self.provider.base_url)
            .with_context(|| format!("Invalid provider base URL: {}", self.provider.base_url))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!("Provider base URL must be http or https, got '{}'", base_url.scheme());
        }

        if self.provider.timeout_secs == 0 {
            bail!("Provider timeout must be at least one second");
        }

        Ok(ServiceConfig {
            city: city.to_string(),
            base_url,
            timeout: Duration::from_secs(self.provider.timeout_secs),
            error_policy: self.provider.error_policy,
        })
    }
}
