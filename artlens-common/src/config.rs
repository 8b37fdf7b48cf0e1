//! Configuration loading and config file resolution
//!
//! Priority order for every setting (highest first):
//! 1. Environment variable
//! 2. TOML config file
//! 3. Compiled default
//!
//! Missing TOML files are not fatal: a warning is logged and defaults apply.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "ARTLENS_CONFIG";

/// Compiled-in defaults used when neither TOML nor environment provide a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            log_level: "info".to_string(),
        }
    }
}

/// `[logging]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    CompiledDefaults::default().log_level
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// On-disk TOML configuration
///
/// Every field is optional so partial files are valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Bearer token for the completion provider
    pub openai_api_key: Option<String>,
    /// API key for the label detection provider
    pub vision_api_key: Option<String>,
    pub text_model: Option<String>,
    pub vision_model: Option<String>,
    pub detector_timeout_secs: Option<u64>,
    pub completion_timeout_secs: Option<u64>,
    pub max_upload_bytes: Option<usize>,
    /// Overrides the generic-label denylist used by the confidence classifier
    pub denylist: Option<Vec<String>>,
}

/// Locates the TOML config file for a module
///
/// Resolution order:
/// 1. Explicit path (command-line argument)
/// 2. `ARTLENS_CONFIG` environment variable
/// 3. `<config_dir>/artlens/<module>.toml`
pub struct ConfigFileResolver {
    module_name: String,
}

impl ConfigFileResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
        }
    }

    pub fn resolve(&self, cli_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = cli_path {
            return Some(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        dirs::config_dir().map(|d| {
            d.join("artlens")
                .join(format!("{}.toml", self.module_name))
        })
    }
}

/// Load TOML config, falling back to defaults if the file does not exist
///
/// A file that exists but cannot be read or parsed is an error: silently
/// ignoring a typo in an API key setting is worse than refusing to start.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Read an environment variable, treating blank values as unset
pub fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable into `T`
///
/// Unset is `Ok(None)`; set but unparsable is a config error.
pub fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env_value(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} has invalid value: {}", name, raw))),
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
