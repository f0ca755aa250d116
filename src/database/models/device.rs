use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named item attached to exactly one room.
///
/// `device_status` is stored and reported but no operation toggles it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Device {
    pub device_id: i64,
    pub device_name: String,
    pub device_status: bool,
    pub room_id: i64,
    pub user_id: i64,
}
