//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Resolve the allowlist from config and the process environment
//! - Apply command-line overrides
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The allowlist is final before the listener accepts traffic

use std::path::Path;

use crate::config::{load_with_allowlist, ConfigError, GatewayConfig};
use crate::security::allowlist::Allowlist;

/// Everything the server needs, resolved once.
#[derive(Debug)]
pub struct Bootstrap {
    pub config: GatewayConfig,
    pub allowlist: Allowlist,
}

/// Load config from `path` (defaults if `None`) and the process environment.
pub fn bootstrap(path: Option<&Path>, bind_override: Option<String>) -> Result<Bootstrap, ConfigError> {
    let (mut config, allowlist) = load_with_allowlist(path, |name| std::env::var(name).ok())?;

    if let Some(bind) = bind_override {
        config.listener.bind_address = bind;
    }

    if allowlist.is_empty() {
        tracing::warn!("Allowlist is empty; every proxied request will be rejected");
    }

    Ok(Bootstrap { config, allowlist })
}
