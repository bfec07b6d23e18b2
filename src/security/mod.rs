//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request:
//!     → allowlist.rs (destination must match a configured prefix and origin)
//!     → headers.rs (drop host / x-forwarded-*)
//!     → forward upstream
//!
//! Upstream response:
//!     → headers.rs (drop hop-by-hop and framing headers)
//!     → relay to client
//! ```
//!
//! # Design Decisions
//! - Fail closed: an empty allowlist rejects everything
//! - No trust in client input: the destination is checked, never rewritten

pub mod allowlist;
pub mod headers;

pub use allowlist::Allowlist;
