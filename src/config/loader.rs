//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::defaults::apply_defaults;
use crate::config::schema::{Config, CONFIG_KEYS, ENDPOINT_KEYS};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

/// Failure category, in the order the pipeline can produce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Parse,
    Validation,
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::Io { .. } => ErrorKind::Io,
            ConfigError::Encoding(_) | ConfigError::Parse(_) => ErrorKind::Parse,
            ConfigError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Fields that failed validation, empty for other failures.
    pub fn invalid_fields(&self) -> Vec<&str> {
        match self {
            ConfigError::Validation(errors) => errors.iter().map(|e| e.field.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Overlay a TOML document onto the baseline configuration.
///
/// The baseline is `Config::default()`, applied by `#[serde(default)]` to
/// every key the document leaves out. No defaulting or validation happens
/// here.
pub fn parse_bytes(bytes: &[u8]) -> Result<Config, ConfigError> {
    let content = std::str::from_utf8(bytes)?;
    let config: Config = toml::from_str(content)?;

    if let Ok(table) = content.parse::<toml::Table>() {
        for key in unknown_keys(&table) {
            match key.suggestion {
                Some(known) => tracing::warn!(key = %key.path, did_you_mean = known, "Ignoring unknown config key"),
                None => tracing::warn!(key = %key.path, "Ignoring unknown config key"),
            }
        }
    }

    Ok(config)
}

/// A document key the schema does not read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey {
    /// Path such as `port` or `Endpoints[0].url`.
    pub path: String,
    /// Known key differing only by case.
    pub suggestion: Option<&'static str>,
}

/// List the keys of a parsed document that would be silently ignored.
pub fn unknown_keys(table: &toml::Table) -> Vec<UnknownKey> {
    let mut unknown = Vec::new();
    collect_unknown(&mut unknown, "", table, &CONFIG_KEYS);

    if let Some(toml::Value::Array(endpoints)) = table.get("Endpoints") {
        for (i, endpoint) in endpoints.iter().enumerate() {
            if let toml::Value::Table(entry) = endpoint {
                collect_unknown(&mut unknown, &format!("Endpoints[{}].", i), entry, &ENDPOINT_KEYS);
            }
        }
    }
    unknown
}

fn collect_unknown(
    unknown: &mut Vec<UnknownKey>,
    prefix: &str,
    table: &toml::Table,
    known: &[&'static str],
) {
    for key in table.keys() {
        if known.contains(&key.as_str()) {
            continue;
        }
        unknown.push(UnknownKey {
            path: format!("{}{}", prefix, key),
            suggestion: known.iter().copied().find(|k| k.eq_ignore_ascii_case(key)),
        });
    }
}

/// Parse, default and validate a TOML document.
pub fn load_bytes(bytes: &[u8]) -> Result<Config, ConfigError> {
    let mut config = parse_bytes(bytes)?;
    apply_defaults(&mut config);

    if let Err(errors) = validate_config(&config) {
        tracing::warn!(violations = errors.len(), "Config validation failed");
        return Err(ConfigError::Validation(errors));
    }

    tracing::debug!(endpoints = config.endpoints.len(), "Config finalized");
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let bytes = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = load_bytes(&bytes)?;
    tracing::info!(path = %path.display(), endpoints = config.endpoints.len(), "Config loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::DEFAULT_ACCEPTABLE_HTTP_STATUSES;
    use std::collections::BTreeSet;

    #[test]
    fn test_empty_document_is_baseline() {
        assert_eq!(parse_bytes(b"").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_overlays_baseline() {
        let config = parse_bytes(b"Port = \"8080\"\nDisableCompression = true\n").unwrap();
        assert_eq!(config.port, "8080");
        assert!(config.disable_compression);
        assert_eq!(config.log_level, "error");
        assert_eq!(config.timeout, 5);
        assert!(config.endpoints.is_empty());
    }

    #[test]
    fn test_wrong_case_key_is_ignored_and_reported() {
        let doc = "port = \"1\"\nTimeOut = 9\n[[Endpoints]]\nName = \"a\"\nurl = \"http://a\"\nRetries = 3\n";
        let config = parse_bytes(doc.as_bytes()).unwrap();
        assert_eq!(config.port, "29300");
        assert_eq!(config.timeout, 5);
        assert!(config.endpoints[0].url.is_empty());

        let table: toml::Table = doc.parse().unwrap();
        let mut keys = unknown_keys(&table);
        keys.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(
            keys,
            vec![
                UnknownKey { path: "Endpoints[0].Retries".into(), suggestion: None },
                UnknownKey { path: "Endpoints[0].url".into(), suggestion: Some("URL") },
                UnknownKey { path: "TimeOut".into(), suggestion: Some("Timeout") },
                UnknownKey { path: "port".into(), suggestion: Some("Port") },
            ]
        );
    }

    #[test]
    fn test_known_keys_not_reported() {
        let table: toml::Table = "Port = \"1\"\n[[Endpoints]]\nName = \"a\"\nURL = \"http://a\"\n"
            .parse()
            .unwrap();
        assert!(unknown_keys(&table).is_empty());
    }

    #[test]
    fn test_parse_does_not_default_statuses() {
        let config = parse_bytes(b"[[Endpoints]]\nName = \"a\"\nURL = \"http://a\"\n").unwrap();
        assert!(config.endpoints[0].acceptable_http_statuses.is_empty());
    }

    #[test]
    fn test_type_mismatch_is_parse_error() {
        let err = load_bytes(b"Timeout = \"five\"\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_malformed_is_parse_error() {
        let err = load_bytes(b"Port = \n[[Endpoints]\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let err = load_bytes(&[b'P', 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ConfigError::Encoding(_)));
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_negative_status_is_parse_error() {
        let doc = b"[[Endpoints]]\nName = \"a\"\nURL = \"http://a\"\nAcceptableHTTPStatuses = [-1]\n";
        assert_eq!(load_bytes(doc).unwrap_err().kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_load_bytes_defaults_and_validates() {
        let config = load_bytes(b"[[Endpoints]]\nName = \"a\"\nURL = \"http://a\"\n").unwrap();
        assert_eq!(
            config.endpoints[0].acceptable_http_statuses,
            DEFAULT_ACCEPTABLE_HTTP_STATUSES.into_iter().collect::<BTreeSet<u16>>()
        );
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let err = load_bytes(b"Timeout = 0\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.invalid_fields(), vec!["Timeout", "Endpoints"]);
        assert_eq!(
            err.to_string(),
            "validation failed: Timeout must be non-zero, Endpoints is required"
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/multirelay.toml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("/nonexistent/multirelay.toml"));
    }
}
