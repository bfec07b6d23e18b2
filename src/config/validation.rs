//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check allowlist entries are absolute http(s) URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: (GatewayConfig, entries) → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address {0:?}")]
    BindAddress(String),

    #[error("mount path {0:?} must start with '/' and not be the root")]
    MountPath(String),

    #[error("allowlist entry {0:?} is not an absolute http(s) URL")]
    AllowlistEntry(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),
}

/// Validate the loaded config together with the allowlist entries it resolved to.
pub fn validate_config(
    config: &GatewayConfig,
    allowlist_entries: &[String],
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let mount = &config.listener.mount_path;
    if !mount.starts_with('/') || mount.trim_end_matches('/').is_empty() {
        errors.push(ValidationError::MountPath(mount.clone()));
    }

    for entry in allowlist_entries {
        if !is_absolute_http_url(entry) {
            errors.push(ValidationError::AllowlistEntry(entry.clone()));
        }
    }

    let timeouts = [
        ("upstream.connect_timeout_secs", config.upstream.connect_timeout_secs),
        ("upstream.read_timeout_secs", config.upstream.read_timeout_secs),
        ("upstream.request_timeout_secs", config.upstream.request_timeout_secs),
    ];
    for (name, value) in timeouts {
        if value == Some(0) {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_absolute_http_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}
