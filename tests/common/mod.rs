//! Shared helpers for config integration tests.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A config file living in its own temp directory.
pub struct ConfigFile {
    pub path: PathBuf,
    _dir: TempDir,
}

/// Write `content` to a fresh `multirelay.toml`.
pub fn write_config(content: &str) -> ConfigFile {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("multirelay.toml");
    fs::write(&path, content).unwrap();
    ConfigFile { path, _dir: dir }
}
