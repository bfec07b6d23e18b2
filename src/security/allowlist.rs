//! Destination allowlist (SSRF guard).
//!
//! # Responsibilities
//! - Collect permitted upstream base URLs from config and environment
//! - Decide whether a caller-supplied destination may be contacted
//! - Report the offending host on rejection
//!
//! # Design Decisions
//! - Built once at startup, immutable afterwards, shared via Arc
//! - Byte-for-byte prefix match so one entry covers a service's path space
//! - The prefix must hold for both the raw value and the parsed URL that is
//!   actually contacted, so `..` segments cannot climb out of a path-scoped entry
//! - The matched entry must also share the destination's origin, so userinfo
//!   tricks (`https://allowed.com@evil.com`) and host extensions
//!   (`https://allowed.com.evil.com`) never pass on the prefix alone

use url::{Origin, Url};

use crate::config::AllowlistConfig;
use crate::http::response::GatewayError;

/// Gather allowlist entries from the config file and the environment.
///
/// Blank and unset values are dropped, duplicates keep their first position.
pub fn collect_entries<F>(config: &AllowlistConfig, lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let from_env = config.env_vars.iter().filter_map(|name| lookup(name.as_str()));

    let mut entries: Vec<String> = Vec::new();
    for raw in config.entries.iter().cloned().chain(from_env) {
        let entry = raw.trim();
        if entry.is_empty() || entries.iter().any(|e| e == entry) {
            continue;
        }
        entries.push(entry.to_string());
    }
    entries
}

#[derive(Debug, Clone)]
struct Entry {
    prefix: String,
    origin: Option<Origin>,
}

/// Ordered set of absolute URL prefixes the gateway may forward to.
#[derive(Debug, Clone, Default)]
pub struct Allowlist {
    entries: Vec<Entry>,
    prefixes: Vec<String>,
}

impl Allowlist {
    /// Build an allowlist from raw entries. Empty entries are discarded.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<Entry> = entries
            .into_iter()
            .map(Into::into)
            .filter(|prefix| !prefix.is_empty())
            .map(|prefix| {
                let origin = Url::parse(&prefix).ok().map(|url| url.origin());
                Entry { prefix, origin }
            })
            .collect();
        let prefixes = entries.iter().map(|e| e.prefix.clone()).collect();
        Self { entries, prefixes }
    }

    /// Configured prefixes in order.
    pub fn entries(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check a raw destination and return it parsed when permitted.
    pub fn authorize(&self, target: &str) -> Result<Url, GatewayError> {
        let parsed = Url::parse(target).ok();

        match parsed {
            Some(url) if self.matches(target, &url) => Ok(url),
            parsed => Err(GatewayError::ForbiddenTarget {
                host: parsed
                    .as_ref()
                    .and_then(|url| url.host_str())
                    .unwrap_or(target)
                    .to_string(),
            }),
        }
    }

    /// Whether an already parsed URL (e.g. a redirect hop) is permitted.
    pub fn permits(&self, url: &Url) -> bool {
        self.matches(url.as_str(), url)
    }

    fn matches(&self, raw: &str, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        let origin = url.origin();
        let normalized = url.as_str();
        self.entries.iter().any(|entry| {
            let prefix = entry.prefix.as_str();
            raw.starts_with(prefix)
                && normalized.starts_with(prefix)
                && entry.origin.as_ref() == Some(&origin)
        })
    }
}
