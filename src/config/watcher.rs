//! Hot reload of the config file.
//!
//! The watcher drives [`SharedConfig::reload`]; it never builds a Config
//! itself. Each successful swap is announced with the snapshot that was
//! published, so consumers can react (rebuild pools, log the diff) without
//! polling. A broken edit leaves the current snapshot in place and sends
//! nothing.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::schema::Config;
use crate::config::shared::SharedConfig;

/// Reloads a [`SharedConfig`] whenever its file changes.
pub struct ConfigWatcher {
    shared: Arc<SharedConfig>,
    swapped_tx: mpsc::UnboundedSender<Arc<Config>>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver that yields every newly published
    /// snapshot.
    pub fn new(shared: Arc<SharedConfig>) -> (Self, mpsc::UnboundedReceiver<Arc<Config>>) {
        let (swapped_tx, swapped_rx) = mpsc::unbounded_channel();
        (Self { shared, swapped_tx }, swapped_rx)
    }

    /// Start watching in a background thread.
    ///
    /// The parent directory is watched rather than the file, so editors that
    /// save by rename keep triggering reloads. Watching stops when the
    /// returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = watch_dir(self.shared.path());
        let file_name = self.shared.path().file_name().map(OsString::from);
        let shared = self.shared;
        let tx = self.swapped_tx;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !is_reload_trigger(&event, file_name.as_deref()) {
                        return;
                    }
                    tracing::info!(path = %shared.path().display(), "Config file change detected, reloading");
                    // Rejections are logged by reload().
                    if let Ok(config) = shared.reload() {
                        let _ = tx.send(config);
                    }
                }
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            NotifyConfig::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!(dir = %dir.display(), "Config watcher started");
        Ok(watcher)
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Content changes and (re)creation of the watched file count; access and
/// removal events, and events for sibling files, do not.
fn is_reload_trigger(event: &Event, file_name: Option<&std::ffi::OsStr>) -> bool {
    let relevant_kind = matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_));
    relevant_kind && event.paths.iter().any(|p| p.file_name() == file_name)
}
