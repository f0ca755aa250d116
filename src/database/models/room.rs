use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::device::Device;

/// Separator used by the flattened `device_names` view of a room.
pub const DEVICE_NAME_DELIMITER: &str = " | ";

/// A room row joined with the label of the floor it sits on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub room_id: i64,
    pub type_of_room: String,
    pub floor_id: i64,
    pub floor_number: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A room together with its devices in creation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetail {
    #[serde(flatten)]
    pub room: Room,
    /// Device names joined with [`DEVICE_NAME_DELIMITER`]; derived, never stored.
    pub device_names: String,
    pub devices: Vec<Device>,
}

impl RoomDetail {
    pub fn new(room: Room, devices: Vec<Device>) -> Self {
        let names: Vec<&str> = devices.iter().map(|d| d.device_name.as_str()).collect();
        Self {
            room,
            device_names: join_device_names(&names),
            devices,
        }
    }
}

pub fn join_device_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(DEVICE_NAME_DELIMITER)
}

/// Inverse of [`join_device_names`] for names that do not contain the delimiter.
/// An empty string yields no names.
pub fn split_device_names(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        return Vec::new();
    }
    joined.split(DEVICE_NAME_DELIMITER).map(str::to_string).collect()
}
