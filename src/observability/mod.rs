//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config load, reload, lookup
//!     → tracing events (structured fields: path, endpoint, violations)
//!     → logging.rs subscriber (stdout, filtered by LogLevel / RUST_LOG)
//! ```

pub mod logging;
