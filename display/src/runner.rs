//! Rendering of floor assignments and the `show`/`carousel` loops.

use alloc::sync::Arc;
use core::{fmt::Write as _, time::Duration};

use eyre::Result;
use floorboard_common::{ConfigChange, DisplayConfig, Floor, assign};
use tokio::{
    signal,
    sync::broadcast::error::RecvError,
    time::{Instant, sleep_until},
};
use tracing::{debug, info, warn};

use crate::{
    api::FloorClient,
    resolver::HttpProbe,
    sync::{
        ConfigSyncBus,
        poll::{FloorsRx, poll_loop},
        storage_watch::watch_store,
    },
};

/// Renders the floors assigned to `screen` (1-based) as text.
#[must_use]
pub fn render_screen(floors: &[Floor], config: &DisplayConfig, screen: u32) -> String {
    let total = config.total_screens;
    let assigned = assign(floors, total as usize, screen as usize);
    let mut out = format!("== Screen {screen}/{total} ==\n");
    if assigned.is_empty() {
        out.push_str("  (no floors)\n");
    }
    for floor in assigned {
        let occupancy = floor.occupancy();
        drop(writeln!(
            out,
            "{} (level {})  {}/{}",
            floor.name, floor.level, occupancy.occupied, occupancy.capacity
        ));
        for room in &floor.rooms {
            let full = if room.is_full() { "  FULL" } else { "" };
            drop(writeln!(
                out,
                "  {:<20} {}/{}{full}",
                room.name, room.occupied, room.capacity
            ));
        }
    }
    out
}

/// The carousel frame after `frame`, wrapping to 1 after the last screen.
#[must_use]
pub const fn next_frame(frame: u32, total_screens: u32) -> u32 {
    if frame >= total_screens { 1 } else { frame + 1 }
}

/// A running display: background refresh tasks plus the data they keep current.
pub struct Dashboard {
    pub bus: Arc<ConfigSyncBus>,
    pub floors: FloorsRx,
}

impl Dashboard {
    /// Spawns the storage watcher and the poll loop.
    pub fn start(
        bus: Arc<ConfigSyncBus>,
        client: Arc<FloorClient<HttpProbe>>,
        poll_interval: Duration,
    ) -> Self {
        let (floors_tx, floors) = tokio::sync::watch::channel(Arc::new(Vec::new()));
        tokio::spawn(watch_store(bus.clone()));
        tokio::spawn(poll_loop(client, bus.clone(), floors_tx, poll_interval));
        Self { bus, floors }
    }

    fn print(&self, screen: u32) {
        let floors = self.floors.borrow().clone();
        println!("{}", render_screen(&floors, &self.bus.current(), screen));
    }

    /// Shows one screen until interrupted, re-rendering on every data or settings change.
    ///
    /// # Errors
    ///
    /// Returns an error if the data channel closes.
    pub async fn show(mut self, screen: u32) -> Result<()> {
        let mut events = self.bus.subscribe();
        self.print(screen);
        loop {
            tokio::select! {
                changed = self.floors.changed() => changed?,
                event = events.recv() => log_event(event),
                _ = signal::ctrl_c() => {
                    info!("Interrupted, stopping display");
                    return Ok(());
                }
            }
            self.print(screen);
        }
    }

    /// Rotates through all screens until interrupted.
    ///
    /// Settings changes take effect on the next rotation.
    ///
    /// # Errors
    ///
    /// Returns an error if the data channel closes.
    pub async fn carousel(mut self) -> Result<()> {
        let mut events = self.bus.subscribe();
        let mut frame = 1;
        let mut deadline = Instant::now() + self.speed();
        self.print(frame);
        loop {
            tokio::select! {
                () = sleep_until(deadline) => {
                    frame = next_frame(frame, self.bus.current().total_screens);
                    deadline = Instant::now() + self.speed();
                    self.print(frame);
                }
                changed = self.floors.changed() => {
                    changed?;
                    self.print(frame);
                }
                event = events.recv() => log_event(event),
                _ = signal::ctrl_c() => {
                    info!("Interrupted, stopping carousel");
                    return Ok(());
                }
            }
        }
    }

    fn speed(&self) -> Duration {
        Duration::from_millis(self.bus.current().carousel_speed_ms)
    }
}

fn log_event(event: Result<ConfigChange, RecvError>) {
    match event {
        Ok(change) => debug!(kind = ?change.kind, value = change.data, "Settings event"),
        Err(RecvError::Lagged(skipped)) => warn!(skipped, "Missed settings events"),
        // the bus outlives every display loop
        Err(RecvError::Closed) => debug!("Settings bus closed"),
    }
}
