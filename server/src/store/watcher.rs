//! Floor data file watching and reloading utilities.
//!
//! This module provides functions for monitoring the floor data file
//! for changes and publishing reloaded data to the application state.

use alloc::sync::Arc;
use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::{Result, WrapErr as _};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};
use tokio::sync::{mpsc::unbounded_channel, watch};
use tracing::{debug, error, info};

use crate::store::{FloorData, load};

pub type DataTx = watch::Sender<Arc<FloorData>>;
pub type DataRx = watch::Receiver<Arc<FloorData>>;

/// Reloads the data file and publishes it if it differs from the current data.
async fn process_data_change(path: &Path, tx: &DataTx) -> Result<()> {
    let new_data = load(path)
        .await
        .wrap_err(format!("Failed to reload floor data at: {}", path.display()))?;
    let changed = tx.send_if_modified(|current| {
        if **current == new_data {
            false
        } else {
            *current = Arc::new(new_data);
            true
        }
    });
    if changed {
        info!("Applied floor data changes from {}", path.display());
    } else {
        debug!("No changes detected in floor data.");
    }
    Ok(())
}

fn matches_data_file(event_path: &Path, path: &Path) -> bool {
    if event_path == path {
        return true;
    }
    if let (Ok(canonical_event), Ok(canonical_data)) =
        (fs::canonicalize(event_path), fs::canonicalize(path))
        && canonical_event == canonical_data
    {
        return true;
    }
    // atomic writes land through temp files renamed onto the target name
    event_path.file_name().is_some() && event_path.file_name() == path.file_name()
}

/// Watches the floor data file for modifications and publishes reloaded data on `tx`.
///
/// The containing directory is watched, so the file may also be created after startup.
pub async fn watch_data_file(path: PathBuf, tx: DataTx) {
    let (raw_tx, mut raw_rx) = unbounded_channel::<Event>();

    let watcher = RecommendedWatcher::new(
        move |res| {
            if let Ok(event) = res
                && raw_tx.send(event).is_err()
            {
                error!("Failed to send event to floor data watcher channel");
            }
        },
        notify::Config::default(),
    );
    let mut watcher = match watcher {
        Ok(watcher) => watcher,
        Err(e) => {
            error!(?e, "Failed to create floor data watcher, live reload disabled");
            return;
        }
    };

    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if let Err(e) = watcher.watch(dir, RecursiveMode::NonRecursive) {
        error!(?e, dir = %dir.display(), "Failed to watch floor data directory, live reload disabled");
        return;
    }

    while let Some(event) = raw_rx.recv().await {
        if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
            && event.paths.iter().any(|p| matches_data_file(p, &path))
            && let Err(e) = process_data_change(&path, &tx).await
        {
            // keep serving the last good data, a later save may fix the file
            error!(?e, "Failed to process floor data change");
        }
    }
}
