//! Floor and room records as served by the API.

use serde::{Deserialize, Serialize};

/// A single room and its current occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: u32,
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub occupied: u32,
}

impl Room {
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.occupied >= self.capacity
    }
}

/// A floor with its rooms, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub id: u32,
    pub name: String,
    /// Vertical position; floors are listed bottom-up.
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

/// Aggregated occupancy of a floor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Occupancy {
    pub occupied: u32,
    pub capacity: u32,
}

impl Floor {
    #[must_use]
    pub fn occupancy(&self) -> Occupancy {
        self.rooms.iter().fold(Occupancy::default(), |acc, room| Occupancy {
            occupied: acc.occupied.saturating_add(room.occupied),
            capacity: acc.capacity.saturating_add(room.capacity),
        })
    }
}

/// Sorts floors into display order: by level, then id.
pub fn sort_floors(floors: &mut [Floor]) {
    floors.sort_by_key(|floor| (floor.level, floor.id));
}
