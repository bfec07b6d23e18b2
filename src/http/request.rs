//! Request inspection.
//!
//! # Responsibilities
//! - Extract the destination from the `X-Target-URL` header
//! - Generate unique request IDs (UUID v4) for correlation
//!
//! # Design Decisions
//! - The destination only ever comes from the header, never path or query
//! - Request ID added as early as possible for tracing; a caller-supplied
//!   ID is kept

use axum::http::{HeaderMap, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::response::GatewayError;

/// Header naming the upstream URL a request should be forwarded to.
pub const X_TARGET_URL: &str = "x-target-url";

/// Correlation header set on every request and echoed on every response.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Read the destination URL from the inbound headers.
///
/// Absent, blank, or non-visible-ASCII values all count as missing.
pub fn resolve_target(headers: &HeaderMap) -> Result<&str, GatewayError> {
    headers
        .get(X_TARGET_URL)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(GatewayError::MissingTarget)
}

/// Request id of an inbound request, if the id layer has run.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Generates UUID v4 request ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        id.parse().ok().map(RequestId::new)
    }
}
