use alloc::sync::Arc;

use floorboard_common::EndpointInfo;

use crate::store::DataRx;

/// Application state shared across request handlers.
#[derive(Clone)]
pub(crate) struct AppState {
    /// The endpoint tuple resolved at boot, served read-only.
    pub endpoint: Arc<EndpointInfo>,
    /// Receiver for the current floor data, updated when the data file changes.
    pub data_rx: DataRx,
}
