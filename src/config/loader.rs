//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::security::allowlist::{collect_entries, Allowlist};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration from a TOML file, or use defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        }
        None => Ok(GatewayConfig::default()),
    }
}

/// Load configuration, resolve the allowlist through `lookup`, and validate both.
///
/// `lookup` maps an environment variable name to its value; pass
/// `|name| std::env::var(name).ok()` in production.
pub fn load_with_allowlist<F>(
    path: Option<&Path>,
    lookup: F,
) -> Result<(GatewayConfig, Allowlist), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = load_config(path)?;
    let entries = collect_entries(&config.allowlist, lookup);

    validate_config(&config, &entries).map_err(ConfigError::Validation)?;

    Ok((config, Allowlist::new(entries)))
}
