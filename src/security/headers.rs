//! Header sanitization for both directions of the relay.
//!
//! # Responsibilities
//! - Drop client-hop identity headers before contacting the upstream
//! - Strip hop-by-hop headers from the upstream response
//!
//! # Design Decisions
//! - Denylist, not allowlist: everything not named here passes unchanged,
//!   including `authorization` and `x-target-url`
//! - The two directions use different lists; `content-length` is kept on
//!   requests and dropped on responses because the response body is re-framed
//! - Multi-valued headers keep every value in their original order

use axum::http::HeaderMap;

/// Headers identifying the client → gateway hop. Never forwarded upstream.
pub const REQUEST_EXCLUDED: &[&str] = &["host", "x-forwarded-for", "x-forwarded-proto"];

/// Hop-by-hop headers plus the framing headers recomputed for the client.
pub const RESPONSE_EXCLUDED: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
    "content-encoding",
    "content-length",
];

/// Copy inbound headers for the upstream request.
pub fn sanitize_request_headers(headers: &HeaderMap) -> HeaderMap {
    copy_except(headers, REQUEST_EXCLUDED)
}

/// Copy upstream response headers for the client.
pub fn sanitize_response_headers(headers: &HeaderMap) -> HeaderMap {
    copy_except(headers, RESPONSE_EXCLUDED)
}

fn copy_except(headers: &HeaderMap, excluded: &[&str]) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        // HeaderName is stored lowercase, so this is a case-insensitive match.
        if excluded.contains(&name.as_str()) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}
