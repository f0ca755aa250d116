use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Floor {
    pub floor_id: i64,
    pub floor_number: String,
    pub user_id: i64,
}

/// One of the three floors every account is provisioned with.
///
/// Routes are generated per slot (`/floor-1-rooms-devices`, `/createpage1`, ...)
/// and the slot's label is what gets matched against `floors.floor_number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloorSlot {
    First,
    Second,
    Third,
}

impl FloorSlot {
    pub const ALL: [FloorSlot; 3] = [FloorSlot::First, FloorSlot::Second, FloorSlot::Third];

    pub fn number(self) -> u8 {
        match self {
            FloorSlot::First => 1,
            FloorSlot::Second => 2,
            FloorSlot::Third => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(FloorSlot::First),
            2 => Some(FloorSlot::Second),
            3 => Some(FloorSlot::Third),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FloorSlot::First => "Floor 1",
            FloorSlot::Second => "Floor 2",
            FloorSlot::Third => "Floor 3",
        }
    }
}

/// Per-floor counts shown on the home page.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FloorSummary {
    pub floor_id: i64,
    pub floor_number: String,
    pub room_count: i64,
    pub device_count: i64,
}
