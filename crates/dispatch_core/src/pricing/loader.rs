//! Configuration store and hot-reload watcher.
//!
//! Single writer, many readers: the watcher swaps an `Arc` snapshot under a
//! write lock held only for the pointer swap; readers clone the `Arc` and
//! never block the swap. A rejected reload keeps the previous snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};

use super::config::{ConfigError, PricingConfig};

/// Process-wide pricing configuration snapshots.
///
/// The file-backed snapshot is authoritative; the fallback config serves
/// requests only when no file config has ever loaded. With neither present
/// pricing fails with `CONFIG_UNAVAILABLE`.
#[derive(Default)]
pub struct ConfigStore {
    snapshot: RwLock<Option<Arc<PricingConfig>>>,
    fallback: RwLock<Option<Arc<PricingConfig>>>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The config serving requests right now, if any.
    pub fn current(&self) -> Option<Arc<PricingConfig>> {
        if let Some(snapshot) = self.snapshot.read().clone() {
            return Some(snapshot);
        }
        self.fallback.read().clone()
    }

    pub fn install(&self, config: PricingConfig) {
        *self.snapshot.write() = Some(Arc::new(config));
    }

    pub fn fallback(&self) -> Option<Arc<PricingConfig>> {
        self.fallback.read().clone()
    }

    /// Replace the fallback config. Validated before the swap.
    pub fn set_fallback(&self, config: PricingConfig) -> Result<(), ConfigError> {
        config.validate()?;
        *self.fallback.write() = Some(Arc::new(config));
        Ok(())
    }
}

/// Polls the config file's mtime and swaps in validated updates.
pub struct ConfigWatcher {
    path: PathBuf,
    reload_interval: Duration,
    store: Arc<ConfigStore>,
    last_modified: Mutex<Option<SystemTime>>,
}

impl ConfigWatcher {
    pub fn new(path: impl Into<PathBuf>, reload_interval: Duration, store: Arc<ConfigStore>) -> Self {
        Self {
            path: path.into(),
            reload_interval,
            store,
            last_modified: Mutex::new(None),
        }
    }

    /// Initial load. Startup must not proceed on failure unless a fallback
    /// config is already installed.
    pub fn load_initial(&self) -> Result<(), ConfigError> {
        let (config, modified) = self.read_config()?;
        info!(path = %self.path.display(), version = %config.version, "pricing config loaded");
        self.store.install(config);
        *self.last_modified.lock() = Some(modified);
        Ok(())
    }

    /// One reload attempt. `Ok(true)` means a new snapshot was installed;
    /// an unchanged mtime is `Ok(false)`. On error the prior snapshot stays.
    pub fn poll_once(&self) -> Result<bool, ConfigError> {
        let modified = file_mtime(&self.path)?;
        if *self.last_modified.lock() == Some(modified) {
            return Ok(false);
        }
        let (config, modified) = self.read_config()?;
        info!(path = %self.path.display(), version = %config.version, "pricing config reloaded");
        self.store.install(config);
        *self.last_modified.lock() = Some(modified);
        Ok(true)
    }

    fn read_config(&self) -> Result<(PricingConfig, SystemTime), ConfigError> {
        let modified = file_mtime(&self.path)?;
        let source = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        let config = PricingConfig::parse(&source)?;
        Ok((config, modified))
    }

    /// Background reload loop. Rejected reloads are logged and the previous
    /// valid config keeps serving; this never surfaces to callers.
    pub fn spawn(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(self.reload_interval).await;
                if let Err(error) = self.poll_once() {
                    warn!(path = %self.path.display(), %error, "pricing config reload rejected; keeping previous config");
                }
            }
        })
    }
}

fn file_mtime(path: &Path) -> Result<SystemTime, ConfigError> {
    let metadata = std::fs::metadata(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    metadata.modified().map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}
