//! Data file layout.

use floorboard_common::{DisplayConfig, Floor};
use serde::Deserialize;

/// Contents of the floor data file.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct FloorData {
    /// Defaults handed to displays whose shared storage was never written.
    #[serde(default)]
    pub display: Option<DisplayConfig>,
    /// Floors in display order once loaded.
    #[serde(default)]
    pub floors: Vec<Floor>,
}
