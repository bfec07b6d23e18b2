//! Upstream forwarding.
//!
//! # Responsibilities
//! - Own the outbound HTTP client (timeouts, redirect policy, proxy settings)
//! - Issue the caller's method to the destination with sanitized headers
//! - Pass the inbound body through as a live stream
//!
//! # Design Decisions
//! - One client for the process; connections pooled per upstream host
//! - No retries: the gateway cannot know whether a call is idempotent
//! - Redirect hops are re-checked against the allowlist before being followed
//! - No response cache exists anywhere on this path
//! - The caller's `accept-encoding` is replaced by the client's own, so every
//!   encoding the upstream may pick is one the client decodes

use axum::body::{Body, HttpBody};
use axum::http::{header::ACCEPT_ENCODING, HeaderMap, Method};
use std::sync::Arc;
use url::Url;

use crate::config::UpstreamConfig;
use crate::http::response::GatewayError;
use crate::security::allowlist::Allowlist;

/// Streams requests to allowlisted upstreams.
#[derive(Clone, Debug)]
pub struct Forwarder {
    client: reqwest::Client,
}

impl Forwarder {
    /// Build the outbound client.
    ///
    /// The allowlist is consulted again for every redirect hop.
    pub fn new(config: &UpstreamConfig, allowlist: Arc<Allowlist>) -> Result<Self, reqwest::Error> {
        let max_redirects = config.max_redirects;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() > max_redirects {
                attempt.error("too many redirects")
            } else if allowlist.permits(attempt.url()) {
                attempt.follow()
            } else {
                tracing::warn!(
                    location = %attempt.url(),
                    "Redirect leaves the allowlist, relaying it to the caller"
                );
                attempt.stop()
            }
        });

        let mut builder = reqwest::Client::builder().redirect(policy);

        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.read_timeout() {
            builder = builder.read_timeout(timeout);
        }
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.as_str());
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Forward one request and return the upstream response with its body unread.
    ///
    /// Resolves once the upstream status line and headers have arrived.
    pub async fn forward(
        &self,
        method: Method,
        target: Url,
        mut headers: HeaderMap,
        body: Body,
    ) -> Result<reqwest::Response, GatewayError> {
        let url = target.to_string();
        headers.remove(ACCEPT_ENCODING);

        let mut request = self.client.request(method, target).headers(headers);
        if !body.is_end_stream() {
            request = request.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        request
            .send()
            .await
            .map_err(|source| GatewayError::UpstreamUnreachable { url, source })
    }
}
