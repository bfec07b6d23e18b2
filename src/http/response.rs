//! Response handling and transformation.
//!
//! # Responsibilities
//! - Map gateway failures to status codes and JSON bodies
//! - Relay the upstream response to the client as a stream
//!
//! # Design Decisions
//! - Gateway-produced errors always carry a `message` field
//! - Upstream status is passed through unchanged, headers after sanitization
//! - Body bytes are never collected; a mid-stream failure just ends the stream

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use futures_util::TryStreamExt;
use serde::Serialize;
use std::error::Error as _;
use thiserror::Error;

use crate::security::headers::sanitize_response_headers;

/// Failures produced by the gateway itself (never proxied from upstream).
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Caller did not say where to go.
    #[error("Request is missing the required X-Target-URL header.")]
    MissingTarget,

    /// Destination is outside the allowlist.
    #[error("Proxying to the host \"{host}\" is not permitted.")]
    ForbiddenTarget { host: String },

    /// Network failure reaching the destination, or any other forwarding fault.
    #[error("Proxy request failed to reach the target server.")]
    UpstreamUnreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MissingTarget => StatusCode::BAD_REQUEST,
            GatewayError::ForbiddenTarget { .. } => StatusCode::FORBIDDEN,
            GatewayError::UpstreamUnreachable { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short label used for metrics and log fields.
    pub fn reason(&self) -> &'static str {
        match self {
            GatewayError::MissingTarget => "missing_target",
            GatewayError::ForbiddenTarget { .. } => "forbidden_target",
            GatewayError::UpstreamUnreachable { .. } => "upstream_unreachable",
        }
    }

    /// Diagnostic detail for the 502 body: the full source chain.
    pub fn detail(&self) -> Option<String> {
        match self {
            GatewayError::UpstreamUnreachable { source, .. } => Some(error_chain(source)),
            _ => None,
        }
    }
}

/// Body of every gateway-produced error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.to_string(),
            error: self.detail(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Join an error and all of its sources into one line.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        out.push_str(": ");
        out.push_str(&source.to_string());
        current = source.source();
    }
    if out.is_empty() {
        out.push_str("unknown error");
    }
    out
}

/// Turn the upstream response into the client response without buffering.
///
/// Status and sanitized headers are fixed before any body byte is relayed.
pub fn relay_response(upstream: reqwest::Response, request_id: &str) -> Response {
    let status = upstream.status();
    let headers = sanitize_response_headers(upstream.headers());
    let url = upstream.url().to_string();
    let request_id = request_id.to_string();

    let stream = upstream.bytes_stream().inspect_err(move |err| {
        tracing::error!(
            request_id = %request_id,
            url = %url,
            error = %err,
            cause = ?err.source(),
            "Upstream body stream failed mid-transfer"
        );
    });

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
