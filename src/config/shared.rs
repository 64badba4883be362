//! Atomically swappable configuration snapshot.
//!
//! Readers take an `Arc<Config>` and keep using it for as long as they like;
//! a reload stores a whole new value. Only configs that passed defaulting and
//! validation are ever stored.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::defaults::apply_defaults;
use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::{Config, EndPoint};
use crate::config::validation::validate_config;
use crate::routing::{find_endpoint, LookupError};

/// Shared handle to the current configuration.
#[derive(Debug)]
pub struct SharedConfig {
    path: PathBuf,
    current: ArcSwap<Config>,
}

impl SharedConfig {
    /// Load the initial configuration. Fails if the file does not produce a
    /// finalized config.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let config = load_config(&path)?;
        Ok(Self {
            path,
            current: ArcSwap::from_pointee(config),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current snapshot.
    pub fn current(&self) -> Arc<Config> {
        self.current.load_full()
    }

    /// Look up an endpoint in the current snapshot.
    pub fn endpoint(&self, name: &str) -> Result<EndPoint, LookupError> {
        let config = self.current.load();
        find_endpoint(&config, name).cloned()
    }

    /// Re-read the file. On failure the previous snapshot stays in place.
    pub fn reload(&self) -> Result<Arc<Config>, ConfigError> {
        match load_config(&self.path) {
            Ok(config) => Ok(self.publish(config)),
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Reload rejected, keeping current configuration");
                Err(e)
            }
        }
    }

    /// Replace the snapshot with `config` after defaulting and validating it.
    pub fn replace(&self, mut config: Config) -> Result<Arc<Config>, ConfigError> {
        apply_defaults(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(self.publish(config))
    }

    fn publish(&self, config: Config) -> Arc<Config> {
        let config = Arc::new(config);
        self.current.store(Arc::clone(&config));
        tracing::info!(endpoints = config.endpoints.len(), "Configuration swapped");
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    const ONE_ENDPOINT: &str = "[[Endpoints]]\nName = \"a\"\nURL = \"http://a\"\n";
    const TWO_ENDPOINTS: &str =
        "Port = \"8080\"\n[[Endpoints]]\nName = \"a\"\nURL = \"http://a\"\n[[Endpoints]]\nName = \"b\"\nURL = \"http://b\"\n";

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("multirelay.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, ONE_ENDPOINT);
        let shared = SharedConfig::load(&path).unwrap();

        let before = shared.current();
        assert!(shared.endpoint("b").is_err());

        fs::write(&path, TWO_ENDPOINTS).unwrap();
        shared.reload().unwrap();

        assert_eq!(shared.current().port, "8080");
        assert_eq!(shared.endpoint("b").unwrap().url, "http://b");
        // Old readers keep their snapshot.
        assert_eq!(before.port, "29300");
        assert_eq!(before.endpoints.len(), 1);
    }

    #[test]
    fn test_failed_reload_keeps_previous() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, ONE_ENDPOINT);
        let shared = SharedConfig::load(&path).unwrap();

        fs::write(&path, "Port = \"9000\"\n").unwrap();
        let err = shared.reload().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(shared.current().port, "29300");
        assert!(shared.endpoint("a").is_ok());
    }

    #[test]
    fn test_replace_finalizes() {
        let dir = TempDir::new().unwrap();
        let shared = SharedConfig::load(write_config(&dir, ONE_ENDPOINT)).unwrap();

        let mut next = Config::default();
        next.endpoints.push(EndPoint::new("c", "http://c"));
        let published = shared.replace(next).unwrap();
        assert!(published.endpoints[0].accepts_status(200));

        assert!(shared.replace(Config::default()).is_err());
        assert_eq!(shared.current().endpoints[0].name, "c");
    }
}
