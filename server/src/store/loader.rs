//! Floor data loading utilities.

use std::{io, path::Path};

use eyre::WrapErr as _;
use floorboard_common::sort_floors;
use tokio::fs;
use tracing::warn;

use crate::store::FloorData;

/// Reads and parses the floor data file, sorting floors into display order.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub(crate) async fn load<P: AsRef<Path>>(path: P) -> eyre::Result<FloorData> {
    let path_ref = path.as_ref();
    let content = fs::read_to_string(path_ref).await.wrap_err(format!(
        "Failed to read floor data at: {}",
        path_ref.display()
    ))?;
    parse(&content).wrap_err(format!(
        "Failed to parse floor data as TOML at: {}",
        path_ref.display()
    ))
}

/// Parses the data file. A `[display]` table with illegal values is dropped with a warning,
/// so displays fall back to their built-in defaults.
pub(crate) fn parse(content: &str) -> Result<FloorData, toml::de::Error> {
    let mut data: FloorData = toml::from_str(content)?;
    sort_floors(&mut data.floors);
    if let Some(display) = data.display.take_if(|display| !display.is_valid()) {
        let invalid = display;
        warn!(
            display = ?invalid,
            "Ignoring [display] defaults: total_screens must be at least 1 and carousel_speed_ms above 0"
        );
    }
    Ok(data)
}

/// Like [`load`], but a missing file yields empty data.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub(crate) async fn load_or_empty(path: &Path) -> eyre::Result<FloorData> {
    match fs::metadata(path).await {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(
                "Floor data file not found at {}, serving no floors until it is created",
                path.display()
            );
            Ok(FloorData::default())
        }
        _ => load(path).await,
    }
}
