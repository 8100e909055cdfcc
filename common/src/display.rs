//! Display configuration shared by every open display, and the events announcing changes to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted key holding the screen count, stored as a stringified integer.
pub const TOTAL_SCREENS_KEY: &str = "totalScreens";
/// Persisted key holding the carousel speed in milliseconds, stored as a stringified integer.
pub const CAROUSEL_SPEED_KEY: &str = "carouselSpeed";

pub const DEFAULT_TOTAL_SCREENS: u32 = 1;
pub const DEFAULT_CAROUSEL_SPEED_MS: u64 = 10_000;

/// How many screens the floors are spread over, and how fast the carousel rotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    /// Always at least 1.
    #[serde(alias = "total_screens")]
    pub total_screens: u32,
    /// Always greater than 0.
    #[serde(alias = "carousel_speed_ms")]
    pub carousel_speed_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            total_screens: DEFAULT_TOTAL_SCREENS,
            carousel_speed_ms: DEFAULT_CAROUSEL_SPEED_MS,
        }
    }
}

impl DisplayConfig {
    /// Overwrites the field addressed by `change`. Returns whether the value differed.
    ///
    /// Invalid values (see [`ConfigKind::accepts`]) are ignored.
    pub const fn apply(&mut self, change: &ConfigChange) -> bool {
        if !change.kind.accepts(change.data) {
            return false;
        }
        match change.kind {
            ConfigKind::Screens => {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "screen counts are bounded by ConfigKind::accepts"
                )]
                let screens = change.data as u32;
                let changed = self.total_screens != screens;
                self.total_screens = screens;
                changed
            }
            ConfigKind::Speed => {
                let changed = self.carousel_speed_ms != change.data;
                self.carousel_speed_ms = change.data;
                changed
            }
        }
    }

    /// Whether every field holds a legal value (see [`ConfigKind::accepts`]).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        ConfigKind::ALL
            .into_iter()
            .all(|kind| kind.accepts(self.get(kind)))
    }

    /// The current value of the field addressed by `kind`.
    #[must_use]
    pub fn get(&self, kind: ConfigKind) -> u64 {
        match kind {
            ConfigKind::Screens => u64::from(self.total_screens),
            ConfigKind::Speed => self.carousel_speed_ms,
        }
    }
}

/// Which display setting a [`ConfigChange`] addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigKind {
    Screens,
    Speed,
}

impl ConfigKind {
    pub const ALL: [Self; 2] = [Self::Screens, Self::Speed];

    /// The persisted storage key for this setting.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Screens => TOTAL_SCREENS_KEY,
            Self::Speed => CAROUSEL_SPEED_KEY,
        }
    }

    /// Whether `value` is a legal value for this setting.
    #[must_use]
    pub const fn accepts(self, value: u64) -> bool {
        match self {
            Self::Screens => value >= 1 && value <= u32::MAX as u64,
            Self::Speed => value > 0,
        }
    }
}

/// The payload of the in-process configuration-change event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigChange {
    #[serde(rename = "type")]
    pub kind: ConfigKind,
    pub data: u64,
    pub timestamp: DateTime<Utc>,
}

impl ConfigChange {
    #[must_use]
    pub fn now(kind: ConfigKind, data: u64) -> Self {
        Self {
            kind,
            data,
            timestamp: Utc::now(),
        }
    }
}
