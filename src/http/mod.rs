//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (any method, any path under the mount point)
//!     → server.rs (Axum setup, request ID, tracing span)
//!     → request.rs (read X-Target-URL)
//!     → security::allowlist (SSRF guard, before any network I/O)
//!     → security::headers (drop client-hop headers)
//!     → forwarder.rs (stream request to upstream)
//!     → response.rs (strip hop-by-hop headers, stream body back)
//!     → Send to client
//! ```

pub mod forwarder;
pub mod request;
pub mod response;
pub mod server;

pub use forwarder::Forwarder;
pub use request::{resolve_target, X_REQUEST_ID, X_TARGET_URL};
pub use response::GatewayError;
pub use server::HttpServer;
