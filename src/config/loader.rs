//! Configuration Loader
//!
//! Environment-aware configuration loading: reads a YAML file, applies
//! `GATEWAY_*` environment overrides and validates the result.

use super::error::{ConfigResult, ConfigurationError};
use super::GatewayConfig;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

pub const ENV_TIMEOUT_MS: &str = "GATEWAY_TIMEOUT_MS";
pub const ENV_MAX_RETRIES: &str = "GATEWAY_MAX_RETRIES";
pub const ENV_RETRY_DELAY_MS: &str = "GATEWAY_RETRY_DELAY_MS";
pub const ENV_LEDGER_CAPACITY: &str = "GATEWAY_LEDGER_CAPACITY";

/// Loaded, validated configuration plus where it came from
#[derive(Debug)]
pub struct ConfigManager {
    config: GatewayConfig,
    environment: String,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration from a YAML file, applying process environment overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<Arc<ConfigManager>> {
        let path = path.as_ref();
        let contents = Self::read_config_file_safely(path)?;
        let config: GatewayConfig = serde_yaml::from_str(&contents)
            .map_err(|e| ConfigurationError::invalid_yaml(path.display().to_string(), e))?;

        Self::finish(config, Some(path.to_path_buf()), |key| env::var(key).ok())
    }

    /// Load configuration from YAML text, applying process environment overrides
    pub fn load_from_str(yaml: &str) -> ConfigResult<Arc<ConfigManager>> {
        let config: GatewayConfig = serde_yaml::from_str(yaml)
            .map_err(|e| ConfigurationError::invalid_yaml("<inline>", e))?;

        Self::finish(config, None, |key| env::var(key).ok())
    }

    /// Build a manager around defaults, applying process environment overrides
    pub fn from_env() -> ConfigResult<Arc<ConfigManager>> {
        Self::finish(GatewayConfig::default(), None, |key| env::var(key).ok())
    }

    fn finish<F>(
        mut config: GatewayConfig,
        source: Option<PathBuf>,
        lookup: F,
    ) -> ConfigResult<Arc<ConfigManager>>
    where
        F: Fn(&str) -> Option<String>,
    {
        apply_env_overrides(&mut config, lookup)?;
        config.validate()?;

        let environment = detect_environment();
        let source_label = source
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<inline>".to_string());
        info!(
            environment = %environment,
            source = %source_label,
            timeout_ms = config.execution.timeout_ms,
            max_retries = config.execution.max_retries,
            ledger_capacity = config.ledger.capacity,
            integrations = config.integrations.len(),
            "🔧 Gateway configuration loaded"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment,
            source,
        }))
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn read_config_file_safely(path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigurationError::ConfigFileNotFound {
                path: path.to_path_buf(),
            });
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| ConfigurationError::file_read_error(path.display().to_string(), e))?;

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigurationError::FileReadError {
                file_path: path.display().to_string(),
                error: format!(
                    "file is {} bytes, limit is {MAX_CONFIG_FILE_SIZE}",
                    metadata.len()
                ),
            });
        }

        debug!(path = %path.display(), "Reading gateway configuration file");
        std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::file_read_error(path.display().to_string(), e))
    }
}

/// Detect the deployment environment from well-known variables
pub fn detect_environment() -> String {
    env::var("GATEWAY_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
        .to_lowercase()
}

/// Apply `GATEWAY_*` overrides resolved through `lookup`
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_TIMEOUT_MS) {
        config.execution.timeout_ms = parse_var(ENV_TIMEOUT_MS, &value)?;
    }
    if let Some(value) = lookup(ENV_MAX_RETRIES) {
        config.execution.max_retries = parse_var(ENV_MAX_RETRIES, &value)?;
    }
    if let Some(value) = lookup(ENV_RETRY_DELAY_MS) {
        config.execution.retry_delay_ms = parse_var(ENV_RETRY_DELAY_MS, &value)?;
    }
    if let Some(value) = lookup(ENV_LEDGER_CAPACITY) {
        config.ledger.capacity = parse_var(ENV_LEDGER_CAPACITY, &value)?;
    }
    Ok(())
}

fn parse_var<T>(variable: &str, value: &str) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigurationError::EnvironmentVariableError {
            variable: variable.to_string(),
            context: format!("'{value}': {e}"),
        })
}
