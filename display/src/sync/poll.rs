//! Fixed-interval refresh of server data and shared display settings.

use alloc::sync::Arc;
use core::time::Duration;

use floorboard_common::Floor;
use tokio::{sync::watch, time::MissedTickBehavior};
use tracing::{debug, info, warn};

use super::{ConfigSyncBus, Source};
use crate::{api::FloorClient, resolver::Probe};

pub type FloorsTx = watch::Sender<Arc<Vec<Floor>>>;
pub type FloorsRx = watch::Receiver<Arc<Vec<Floor>>>;

/// Publishes `floors` if they differ from the current ones. Returns whether they did.
pub(crate) fn publish_floors(floors_tx: &FloorsTx, floors: Vec<Floor>) -> bool {
    floors_tx.send_if_modified(|current| {
        if **current == floors {
            false
        } else {
            *current = Arc::new(floors);
            true
        }
    })
}

/// One poll round: fetch floors, then re-read the shared settings.
pub async fn poll_once<P: Probe>(client: &FloorClient<P>, bus: &ConfigSyncBus, floors_tx: &FloorsTx) {
    match client.floors().await {
        Ok(floors) => {
            if publish_floors(floors_tx, floors) {
                info!("Floor data changed");
            } else {
                debug!("No change in floor data");
            }
        }
        // keep showing the last good data
        Err(e) => warn!("Failed to refresh floors: {}", eyre::Report::new(e)),
    }
    if let Err(e) = bus.reload_from_store(Source::Poll).await {
        warn!("{}", eyre::Report::new(e));
    }
}

/// Polls every `interval` until the task is dropped. The first round runs immediately.
pub async fn poll_loop<P: Probe>(
    client: Arc<FloorClient<P>>,
    bus: Arc<ConfigSyncBus>,
    floors_tx: FloorsTx,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        poll_once(&client, &bus, &floors_tx).await;
    }
}
