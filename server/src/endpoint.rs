//! Publishes the resolved endpoint to a well-known file for co-located clients.

use std::{
    io,
    path::{Path, PathBuf},
};

use floorboard_common::EndpointInfo;
use thiserror::Error as ThisError;
use tokio::fs;
use tracing::{info, warn};

#[derive(Debug, ThisError)]
pub enum PublishError {
    #[error("Failed to serialize endpoint info")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write endpoint file at: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes `info` as JSON to `path`, overwriting any previous content.
///
/// # Errors
///
/// Returns an error if the info cannot be serialized or the file cannot be written.
pub async fn write_endpoint_file(path: &Path, info: &EndpointInfo) -> Result<(), PublishError> {
    let json = serde_json::to_string_pretty(info)?;
    fs::write(path, json)
        .await
        .map_err(|source| PublishError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Publishes `info` to `path`. Failures are logged; clients then fall back to probing.
pub async fn publish(path: &Path, info: &EndpointInfo) {
    match write_endpoint_file(path, info).await {
        Ok(()) => info!(path = %path.display(), api_url = %info.api_url, "Published endpoint"),
        Err(e) => warn!(
            "Could not publish endpoint, clients will have to probe for the server: {}",
            eyre::Report::new(e)
        ),
    }
}
