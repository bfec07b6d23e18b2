//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variables that feed the allowlist when none are configured.
pub const DEFAULT_ALLOWLIST_ENV_VARS: &[&str] = &[
    "AUTH_API_BASE_URL",
    "ORGANIZATION_API_BASE_URL",
    "MEDIA_API_BASE_URL",
];

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, mount path).
    pub listener: ListenerConfig,

    /// Destinations the gateway may contact.
    pub allowlist: AllowlistConfig,

    /// Outbound client settings.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Path the gateway is mounted under. Sub-paths are accepted but not interpreted.
    pub mount_path: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            mount_path: "/api/proxy".to_string(),
        }
    }
}

/// Allowlist sources.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AllowlistConfig {
    /// URL prefixes listed directly in the config file.
    pub entries: Vec<String>,

    /// Environment variables holding upstream base URLs. Unset ones are skipped.
    pub env_vars: Vec<String>,
}

impl Default for AllowlistConfig {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            env_vars: DEFAULT_ALLOWLIST_ENV_VARS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

/// Outbound HTTP client configuration.
///
/// Unset timeouts fall back to the client's own defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: Option<u64>,

    /// Per-read timeout in seconds, applied to each body chunk.
    pub read_timeout_secs: Option<u64>,

    /// Total request timeout in seconds, including the streamed body.
    pub request_timeout_secs: Option<u64>,

    /// Maximum redirect hops followed per request.
    pub max_redirects: usize,

    /// Honour HTTP(S)_PROXY from the environment for outbound calls.
    pub use_system_proxy: bool,

    /// Fixed User-Agent for outbound calls. The caller's header is forwarded when unset.
    pub user_agent: Option<String>,
}

impl UpstreamConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: Some(10),
            read_timeout_secs: None,
            request_timeout_secs: None,
            max_redirects: 10,
            use_system_proxy: false,
            user_agent: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
