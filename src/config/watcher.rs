//! Hot reload of the contact config file.
//!
//! The parent directory is watched rather than the file itself so that
//! editors which save by renaming a temp file over the original are seen.
//! Listener settings are bound at startup; a reload that changes them is
//! applied with the running listener kept and a warning logged.

use std::path::{Path, PathBuf};
use std::time::Duration;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::{ContactConfig, ListenerConfig};

/// Watches one config file and sends every valid new version.
pub struct ConfigWatcher {
    path: PathBuf,
    listener: ListenerConfig,
    update_tx: mpsc::UnboundedSender<ContactConfig>,
}

impl ConfigWatcher {
    /// `listener` is the listener the server was started with.
    pub fn new(path: &Path, listener: ListenerConfig) -> (Self, mpsc::UnboundedReceiver<ContactConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            listener,
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Dropping the returned handle stops the watch.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, listener, update_tx } = self;
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let target = path.file_name().map(ToOwned::to_owned);

        let watched = path.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let relevant = (event.kind.is_modify() || event.kind.is_create())
                        && event.paths.iter().any(|p| p.file_name() == target.as_deref());
                    if !relevant {
                        return;
                    }
                    match load_config(&watched) {
                        Ok(mut next) => {
                            pin_listener(&listener, &mut next);
                            tracing::info!(path = ?watched, "Config file reloaded");
                            let _ = update_tx.send(next);
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Config reload rejected, keeping current configuration");
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}

/// Names of listener settings that differ between `running` and `next`.
pub fn restart_only_changes(running: &ListenerConfig, next: &ListenerConfig) -> Vec<&'static str> {
    let mut changed = Vec::new();
    if running.bind_address != next.bind_address {
        changed.push("listener.bind_address");
    }
    if running.endpoint_path != next.endpoint_path {
        changed.push("listener.endpoint_path");
    }
    if running.tls != next.tls {
        changed.push("listener.tls");
    }
    changed
}

/// Replace the listener section of a reloaded config with the running one.
fn pin_listener(running: &ListenerConfig, next: &mut ContactConfig) {
    let changed = restart_only_changes(running, &next.listener);
    if !changed.is_empty() {
        tracing::warn!(settings = ?changed, "Listener settings changed on disk; restart to apply");
    }
    next.listener = running.clone();
}
