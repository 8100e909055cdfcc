//! Propagates display configuration changes to every open display.
//!
//! A change made through [`ConfigSyncBus::notify`] is persisted to the shared store and
//! announced in-process right away. Other display processes pick it up through two
//! independent mechanisms with different guarantees:
//!
//! - [`storage_watch`]: a file-change notification on the shared store. It is immediate,
//!   but never fires for the process that made the write, and only reaches processes
//!   sharing the same store file.
//! - [`poll`]: a fixed-interval poll that re-fetches server data and re-reads the store.
//!   It always fires eventually, everywhere, with up to one interval of latency.
//!
//! Both funnel into the same overwrite path; the most recently observed value wins.

pub mod poll;
pub mod storage_watch;
mod store;

use std::{io, path::PathBuf};

use floorboard_common::{ConfigChange, ConfigKind, DisplayConfig};
use thiserror::Error as ThisError;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

pub use store::{FileStore, StoredValues};

#[derive(Debug, ThisError)]
pub enum SyncError {
    #[error("Invalid value {value} for {kind:?}")]
    InvalidValue { kind: ConfigKind, value: u64 },
    #[error("Failed to access shared display storage at: {}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Shared display storage at {} is corrupt", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where an applied configuration value was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// [`ConfigSyncBus::notify`] in this process.
    Local,
    /// The shared store changed on disk.
    Storage,
    /// The periodic poll.
    Poll,
}

/// Overlays the stored values onto `base`; missing or invalid entries keep `base`'s value.
#[must_use]
pub fn config_from_values(values: &StoredValues, base: DisplayConfig) -> DisplayConfig {
    let mut config = base;
    for kind in ConfigKind::ALL {
        let parsed = values
            .get(kind.storage_key())
            .and_then(|raw| raw.trim().parse::<u64>().ok());
        if let Some(value) = parsed {
            config.apply(&ConfigChange::now(kind, value));
        }
    }
    config
}

pub struct ConfigSyncBus {
    store: FileStore,
    events: broadcast::Sender<ConfigChange>,
    current: watch::Sender<DisplayConfig>,
}

impl ConfigSyncBus {
    /// Opens the bus on `store`, starting from its persisted values over `defaults`.
    ///
    /// Unreadable storage is logged and the defaults are used. Illegal defaults are replaced
    /// by [`DisplayConfig::default`].
    pub async fn open(store: FileStore, defaults: DisplayConfig) -> Self {
        let defaults = if defaults.is_valid() {
            defaults
        } else {
            warn!(?defaults, "Ignoring illegal display defaults, using built-in ones");
            DisplayConfig::default()
        };
        let initial = match store.read().await {
            Ok(values) => config_from_values(&values, defaults),
            Err(e) => {
                warn!("{}, starting from defaults", eyre::Report::new(e));
                defaults
            }
        };
        info!(?initial, store = %store.path().display(), "Display configuration loaded");
        let (events, _) = broadcast::channel(32);
        Self {
            store,
            events,
            current: watch::Sender::new(initial),
        }
    }

    /// Sets one display setting: persists it for every display and announces it in-process.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not legal for `kind` or the store cannot be written.
    /// An illegal value is rejected before anything is persisted.
    pub async fn notify(&self, kind: ConfigKind, value: u64) -> Result<ConfigChange, SyncError> {
        if !kind.accepts(value) {
            return Err(SyncError::InvalidValue { kind, value });
        }
        self.store
            .set(kind.storage_key(), value.to_string())
            .await?;
        let change = ConfigChange::now(kind, value);
        self.apply(&change, Source::Local);
        Ok(change)
    }

    /// The configuration as last observed.
    pub fn current(&self) -> DisplayConfig {
        *self.current.borrow()
    }

    /// Receiver that sees every overwrite of the current configuration.
    pub fn watch(&self) -> watch::Receiver<DisplayConfig> {
        self.current.subscribe()
    }

    /// In-process change events, one per changed setting.
    pub fn subscribe(&self) -> broadcast::Receiver<ConfigChange> {
        self.events.subscribe()
    }

    pub(crate) const fn store(&self) -> &FileStore {
        &self.store
    }

    /// Adopts whatever the shared store currently holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn reload_from_store(&self, source: Source) -> Result<(), SyncError> {
        let values = self.store.read().await?;
        self.apply_values(&values, source);
        Ok(())
    }

    pub(crate) fn apply_values(&self, values: &StoredValues, source: Source) {
        let observed = config_from_values(values, self.current());
        for kind in ConfigKind::ALL {
            self.apply(&ConfigChange::now(kind, observed.get(kind)), source);
        }
    }

    /// The single overwrite path. Emits an event only if the value changed.
    fn apply(&self, change: &ConfigChange, source: Source) {
        let changed = self.current.send_if_modified(|config| config.apply(change));
        if changed {
            info!(kind = ?change.kind, value = change.data, ?source, "Display configuration changed");
            if self.events.send(change.clone()).is_err() {
                debug!("No in-process listeners for configuration changes");
            }
        }
    }
}
