//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ContactConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides the webhook URL from the environment.
pub const WEBHOOK_URL_ENV: &str = "CONTACT_WEBHOOK_URL";
/// Overrides the listener bind address from the environment.
pub const BIND_ADDRESS_ENV: &str = "CONTACT_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// Environment overrides are applied before validation.
pub fn load_config(path: &Path) -> Result<ContactConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: ContactConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |key| env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a configuration from defaults plus environment overrides.
pub fn load_from_env() -> Result<ContactConfig, ConfigError> {
    let mut config = ContactConfig::default();
    apply_env_overrides(&mut config, |key| env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides using the given lookup.
///
/// Empty values are ignored so that an exported-but-blank variable does not
/// clear a URL set in the file.
pub fn apply_env_overrides<F>(config: &mut ContactConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(WEBHOOK_URL_ENV).filter(|v| !v.trim().is_empty()) {
        config.webhook.url = Some(url.trim().to_string());
    }
    if let Some(addr) = lookup(BIND_ADDRESS_ENV).filter(|v| !v.trim().is_empty()) {
        config.listener.bind_address = addr.trim().to_string();
    }
}
