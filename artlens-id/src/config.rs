//! Configuration resolution for artlens-id
//!
//! Provides 3-tier resolution with ENV → TOML → compiled default priority.
//! Command-line flags (host, port) are applied on top by `main`.

use artlens_common::config::{
    env_parse, env_value, is_valid_key, CompiledDefaults, TomlConfig,
};
use artlens_common::{Error, Result};
use std::time::Duration;
use tracing::{info, warn};

use crate::services::{DEFAULT_DENYLIST, DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL};
use crate::DEFAULT_MAX_UPLOAD_BYTES;

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const VISION_API_KEY_ENV: &str = "GOOGLE_VISION_API_KEY";
pub const HOST_ENV: &str = "ARTLENS_HOST";
pub const PORT_ENV: &str = "PORT";
pub const TEXT_MODEL_ENV: &str = "ARTLENS_TEXT_MODEL";
pub const VISION_MODEL_ENV: &str = "ARTLENS_VISION_MODEL";

const DEFAULT_DETECTOR_TIMEOUT_SECS: u64 = 30;
const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 60;

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub openai_api_key: String,
    pub vision_api_key: String,
    pub text_model: String,
    pub vision_model: String,
    pub detector_timeout: Duration,
    pub completion_timeout: Duration,
    pub max_upload_bytes: usize,
    pub denylist: Vec<String>,
}

impl ServiceConfig {
    /// Resolve every setting from environment, TOML and defaults
    pub fn resolve(toml_config: &TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::default();

        let openai_api_key = resolve_api_key(
            "OpenAI",
            OPENAI_API_KEY_ENV,
            toml_config.openai_api_key.as_deref(),
            "openai_api_key",
        )?;
        let vision_api_key = resolve_api_key(
            "Google Vision",
            VISION_API_KEY_ENV,
            toml_config.vision_api_key.as_deref(),
            "vision_api_key",
        )?;

        let host = env_value(HOST_ENV)
            .or_else(|| toml_config.host.clone())
            .unwrap_or(defaults.host);
        let port = env_parse::<u16>(PORT_ENV)?
            .or(toml_config.port)
            .unwrap_or(defaults.port);

        let text_model = env_value(TEXT_MODEL_ENV)
            .or_else(|| toml_config.text_model.clone())
            .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string());
        let vision_model = env_value(VISION_MODEL_ENV)
            .or_else(|| toml_config.vision_model.clone())
            .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string());

        let detector_timeout = Duration::from_secs(
            toml_config
                .detector_timeout_secs
                .unwrap_or(DEFAULT_DETECTOR_TIMEOUT_SECS),
        );
        let completion_timeout = Duration::from_secs(
            toml_config
                .completion_timeout_secs
                .unwrap_or(DEFAULT_COMPLETION_TIMEOUT_SECS),
        );
        if detector_timeout.is_zero() || completion_timeout.is_zero() {
            return Err(Error::Config("timeouts must be greater than zero".to_string()));
        }

        let max_upload_bytes = toml_config
            .max_upload_bytes
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let denylist = match &toml_config.denylist {
            Some(terms) if terms.iter().any(|t| !t.trim().is_empty()) => terms.clone(),
            Some(_) => {
                warn!("Configured denylist is empty, using default denylist");
                default_denylist()
            }
            None => default_denylist(),
        };

        Ok(Self {
            host,
            port,
            log_level: toml_config.logging.level.clone(),
            openai_api_key,
            vision_api_key,
            text_model,
            vision_model,
            detector_timeout,
            completion_timeout,
            max_upload_bytes,
            denylist,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_denylist() -> Vec<String> {
    DEFAULT_DENYLIST.iter().map(|t| t.to_string()).collect()
}

/// Resolve one API key
///
/// **Priority:** ENV → TOML
pub fn resolve_api_key(
    provider: &str,
    env_var: &str,
    toml_value: Option<&str>,
    toml_key: &str,
) -> Result<String> {
    let env_key = env_value(env_var).filter(|k| is_valid_key(k));
    let toml_key_value = toml_value.filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key_value.is_some() {
        warn!(
            "{} API key found in both environment and TOML. Using environment (highest priority).",
            provider
        );
    }

    if let Some(key) = env_key {
        info!("{} API key loaded from environment variable", provider);
        return Ok(key);
    }

    if let Some(key) = toml_key_value {
        info!("{} API key loaded from TOML config", provider);
        return Ok(key.to_string());
    }

    Err(Error::Config(format!(
        "{provider} API key not configured. Please configure using one of:\n\
         1. Environment: {env_var}=your-key-here\n\
         2. TOML config: ~/.config/artlens/artlens-id.toml ({toml_key} = \"your-key\")",
    )))
}
