//! Configuration core for a multi-endpoint HTTP relay.

pub mod config;
pub mod observability;
pub mod routing;

pub use config::{load_config, Config, ConfigError, EndPoint, SharedConfig};
pub use routing::{find_endpoint, LookupError};
