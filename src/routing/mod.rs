//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Relay request names a target
//!     → lookup.rs (scan Endpoints by name)
//!     → Return: matched EndPoint or NotFound
//! ```
//!
//! # Design Decisions
//! - Read-only over a finalized Config (safe to share without locks)
//! - Deterministic: first match in declaration order wins
//! - A miss rejects one request, never the whole config

pub mod lookup;

pub use lookup::{find_endpoint, LookupError};
