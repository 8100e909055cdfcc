//! Change notifications on the shared store, for displays in other processes.

use alloc::sync::Arc;
use std::path::Path;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};
use tokio::sync::mpsc::unbounded_channel;
use tracing::{debug, error, warn};

use super::{ConfigSyncBus, Source, store::parse_values};

fn is_store_event(event: &Event, store_path: &Path) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event
            .paths
            .iter()
            .any(|p| p.file_name().is_some() && p.file_name() == store_path.file_name())
}

/// Applies the store's content if another process wrote it.
async fn process_store_change(bus: &ConfigSyncBus) {
    let content = match bus.store().read_raw().await {
        Ok(Some(content)) => content,
        Ok(None) => return,
        Err(e) => {
            warn!("{}", eyre::Report::new(e));
            return;
        }
    };
    if bus.store().is_own_write(&content).await {
        debug!("Ignoring notification for this process's own write");
        return;
    }
    match parse_values(&content) {
        Ok(values) => bus.apply_values(&values, Source::Storage),
        // usually a writer mid-way through a non-atomic save, the next event brings the rest
        Err(e) => debug!("Shared display storage not parseable yet: {e}"),
    }
}

/// Watches the shared store and applies changes made by other processes.
///
/// Runs until the watcher fails to start; a failure only disables this mechanism,
/// polling still converges every display.
pub async fn watch_store(bus: Arc<ConfigSyncBus>) {
    let (raw_tx, mut raw_rx) = unbounded_channel::<Event>();

    let watcher = RecommendedWatcher::new(
        move |res| {
            if let Ok(event) = res
                && raw_tx.send(event).is_err()
            {
                error!("Failed to send event to storage watcher channel");
            }
        },
        notify::Config::default(),
    );
    let mut watcher = match watcher {
        Ok(watcher) => watcher,
        Err(e) => {
            error!(?e, "Failed to create storage watcher, relying on polling");
            return;
        }
    };

    let store_path = bus.store().path().to_path_buf();
    let dir = store_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if let Err(e) = watcher.watch(dir, RecursiveMode::NonRecursive) {
        error!(?e, dir = %dir.display(), "Failed to watch storage directory, relying on polling");
        return;
    }

    while let Some(event) = raw_rx.recv().await {
        if is_store_event(&event, &store_path) {
            process_store_change(&bus).await;
        }
    }
}
