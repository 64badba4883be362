//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → schema.rs (Config::default() baseline)
//!     → loader.rs (read bytes, overlay document onto baseline)
//!     → defaults.rs (default status policy per endpoint)
//!     → validation.rs (required fields, all violations at once)
//!     → Config (finalized, immutable)
//!     → shared.rs (Arc snapshot handed to readers)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → atomic swap of Arc<Config>
//!     → readers observe new config on next load
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - Every scalar has a default to allow minimal configs
//! - A failed load never yields a partially built Config

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod shared;
pub mod validation;
pub mod watcher;

pub use defaults::{apply_defaults, DEFAULT_ACCEPTABLE_HTTP_STATUSES};
pub use loader::{load_bytes, load_config, parse_bytes, unknown_keys, ConfigError, ErrorKind, UnknownKey};
pub use schema::{Config, EndPoint, HeaderPair, StatusPolicy};
pub use shared::SharedConfig;
pub use validation::{validate_config, ValidationError, Violation};
