//! Allowlisted outbound reverse-proxy gateway.
//!
//! Browser-side code calls a single endpoint with the real destination in the
//! `X-Target-URL` header; the gateway checks it against an allowlist of
//! upstream base URLs and streams the request and response through.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use security::Allowlist;
