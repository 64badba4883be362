//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Map the config's `LogLevel` onto a tracing level
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the config file when set
//! - An unknown `LogLevel` is not fatal; it falls back to `error`

use tracing::Level;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Level used when the configured one is not recognised.
pub const FALLBACK_LEVEL: Level = Level::ERROR;

/// Parse a `LogLevel` value. Case-insensitive; `fatal` and `panic` are
/// accepted as `error` so older relay configs keep working.
pub fn parse_level(value: &str) -> Option<Level> {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" | "fatal" | "panic" => Some(Level::ERROR),
        _ => None,
    }
}

/// Install the global subscriber.
///
/// Fails only if a subscriber is already installed.
pub fn init(log_level: &str) -> Result<(), TryInitError> {
    let level = parse_level(log_level);
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(level.unwrap_or(FALLBACK_LEVEL)).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    if level.is_none() {
        tracing::warn!(log_level, fallback = %FALLBACK_LEVEL, "Unknown LogLevel");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("error"), Some(Level::ERROR));
        assert_eq!(parse_level("INFO"), Some(Level::INFO));
        assert_eq!(parse_level(" warning "), Some(Level::WARN));
        assert_eq!(parse_level("fatal"), Some(Level::ERROR));
        assert_eq!(parse_level("verbose"), None);
        assert_eq!(parse_level(""), None);
    }
}
