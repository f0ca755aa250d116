use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::database::models::{Device, Floor, FloorSummary, Room, RoomDetail, User, DEVICE_NAME_DELIMITER};

use super::error::{HomeError, HomeResult};

pub const ROOM_NOT_FOUND: &str = "Room not found!";
pub const FLOOR_NOT_FOUND: &str = "Floor not found for user";

const ROOM_COLUMNS: &str = r#"
    r.room_id, r.type_of_room, r.floor_id, f.floor_number, r.user_id, r.created_at
"#;

/// Room provisioning, scoped queries and cascading deletion.
///
/// Every statement filters on the caller's `user_id`; nothing here ever reads
/// a row belonging to another account.
pub struct RoomService {
    pool: SqlitePool,
}

/// Trim names, drop blanks, and refuse names that would corrupt the joined
/// `device_names` view.
pub fn normalize_device_names<S: AsRef<str>>(names: &[S]) -> HomeResult<Vec<String>> {
    let mut normalized = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        if name.contains(DEVICE_NAME_DELIMITER.trim()) {
            return Err(HomeError::validation(format!(
                "Device name '{}' must not contain '{}'",
                name,
                DEVICE_NAME_DELIMITER.trim()
            )));
        }
        normalized.push(name.to_string());
    }
    Ok(normalized)
}

impl RoomService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a room on the caller's `floor_label` floor with one device per
    /// name. Room and devices are committed together or not at all.
    pub async fn create_room<S: AsRef<str>>(
        &self,
        user: &User,
        floor_label: &str,
        room_type: &str,
        device_names: &[S],
    ) -> HomeResult<RoomDetail> {
        let room_type = room_type.trim();
        if room_type.is_empty() {
            return Err(HomeError::validation("Room type is required."));
        }
        let device_names = normalize_device_names(device_names)?;

        let mut tx = self.pool.begin().await?;

        let floor: Option<Floor> = sqlx::query_as(
            "SELECT floor_id, floor_number, user_id FROM floors WHERE user_id = ? AND floor_number = ?",
        )
        .bind(user.id)
        .bind(floor_label)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(floor) = floor else {
            return Err(HomeError::integrity(FLOOR_NOT_FOUND));
        };

        let room_id: i64 = sqlx::query_scalar(
            "INSERT INTO rooms (type_of_room, floor_id, user_id, created_at) VALUES (?, ?, ?, ?) RETURNING room_id",
        )
        .bind(room_type)
        .bind(floor.floor_id)
        .bind(user.id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let mut devices = Vec::with_capacity(device_names.len());
        for name in &device_names {
            let device: Device = sqlx::query_as(
                r#"
                INSERT INTO devices (device_name, room_id, user_id) VALUES (?, ?, ?)
                RETURNING device_id, device_name, device_status, room_id, user_id
                "#,
            )
            .bind(name)
            .bind(room_id)
            .bind(user.id)
            .fetch_one(&mut *tx)
            .await?;
            devices.push(device);
        }

        let room: Room = sqlx::query_as(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms r JOIN floors f ON f.floor_id = r.floor_id WHERE r.room_id = ?"
        ))
        .bind(room_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            user_id = user.id,
            room_id,
            floor = floor_label,
            devices = devices.len(),
            "Provisioned room"
        );
        Ok(RoomDetail::new(room, devices))
    }

    /// Rooms on the caller's floor named `floor_label`, oldest first.
    pub async fn list_rooms(&self, user: &User, floor_label: &str) -> HomeResult<Vec<RoomDetail>> {
        let rooms: Vec<Room> = sqlx::query_as(&format!(
            r#"
            SELECT {ROOM_COLUMNS}
            FROM rooms r JOIN floors f ON f.floor_id = r.floor_id
            WHERE r.user_id = ? AND f.user_id = ? AND f.floor_number = ?
            ORDER BY r.room_id
            "#
        ))
        .bind(user.id)
        .bind(user.id)
        .bind(floor_label)
        .fetch_all(&self.pool)
        .await?;

        let devices: Vec<Device> = sqlx::query_as(
            r#"
            SELECT d.device_id, d.device_name, d.device_status, d.room_id, d.user_id
            FROM devices d
            JOIN rooms r ON r.room_id = d.room_id
            JOIN floors f ON f.floor_id = r.floor_id
            WHERE d.user_id = ? AND r.user_id = ? AND f.floor_number = ?
            ORDER BY d.device_id
            "#,
        )
        .bind(user.id)
        .bind(user.id)
        .bind(floor_label)
        .fetch_all(&self.pool)
        .await?;

        let mut by_room: HashMap<i64, Vec<Device>> = HashMap::new();
        for device in devices {
            by_room.entry(device.room_id).or_default().push(device);
        }

        debug!(user_id = user.id, floor = floor_label, rooms = rooms.len(), "Listed rooms");
        Ok(rooms
            .into_iter()
            .map(|room| {
                let devices = by_room.remove(&room.room_id).unwrap_or_default();
                RoomDetail::new(room, devices)
            })
            .collect())
    }

    /// The room and its devices, if the caller owns it.
    pub async fn get_room_detail(&self, user: &User, room_id: i64) -> HomeResult<RoomDetail> {
        let room: Option<Room> = sqlx::query_as(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms r JOIN floors f ON f.floor_id = r.floor_id WHERE r.room_id = ? AND r.user_id = ?"
        ))
        .bind(room_id)
        .bind(user.id)
        .fetch_optional(&self.pool)
        .await?;

        let room = room.ok_or_else(|| HomeError::not_found(ROOM_NOT_FOUND))?;

        let devices = sqlx::query_as(
            r#"
            SELECT device_id, device_name, device_status, room_id, user_id
            FROM devices WHERE room_id = ? AND user_id = ?
            ORDER BY device_id
            "#,
        )
        .bind(room_id)
        .bind(user.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(RoomDetail::new(room, devices))
    }

    /// Delete the caller's room and all of its devices in one transaction.
    pub async fn delete_room(&self, user: &User, room_id: i64) -> HomeResult<()> {
        let mut tx = self.pool.begin().await?;

        let owned: Option<i64> = sqlx::query_scalar("SELECT room_id FROM rooms WHERE room_id = ? AND user_id = ?")
            .bind(room_id)
            .bind(user.id)
            .fetch_optional(&mut *tx)
            .await?;

        if owned.is_none() {
            debug!(user_id = user.id, room_id, "Delete refused: room not owned or missing");
            return Err(HomeError::not_found(ROOM_NOT_FOUND));
        }

        let devices = sqlx::query("DELETE FROM devices WHERE room_id = ? AND user_id = ?")
            .bind(room_id)
            .bind(user.id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM rooms WHERE room_id = ? AND user_id = ?")
            .bind(room_id)
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(user_id = user.id, room_id, devices, "Deleted room");
        Ok(())
    }

    /// Every device the caller owns, across all rooms.
    pub async fn list_devices(&self, user: &User) -> HomeResult<Vec<Device>> {
        let devices = sqlx::query_as(
            r#"
            SELECT device_id, device_name, device_status, room_id, user_id
            FROM devices WHERE user_id = ?
            ORDER BY room_id, device_id
            "#,
        )
        .bind(user.id)
        .fetch_all(&self.pool)
        .await?;
        Ok(devices)
    }

    /// Room and device counts for each of the caller's floors.
    pub async fn floor_summary(&self, user: &User) -> HomeResult<Vec<FloorSummary>> {
        let floors = sqlx::query_as(
            r#"
            SELECT
                f.floor_id,
                f.floor_number,
                COUNT(DISTINCT r.room_id) AS room_count,
                COUNT(d.device_id) AS device_count
            FROM floors f
            LEFT JOIN rooms r ON r.floor_id = f.floor_id AND r.user_id = f.user_id
            LEFT JOIN devices d ON d.room_id = r.room_id AND d.user_id = f.user_id
            WHERE f.user_id = ?
            GROUP BY f.floor_id, f.floor_number
            ORDER BY f.floor_number
            "#,
        )
        .bind(user.id)
        .fetch_all(&self.pool)
        .await?;
        Ok(floors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;

    #[test]
    fn device_names_are_trimmed_and_blanks_dropped() {
        let names = normalize_device_names(&["  Lamp ", "", "   ", "Fan"]).unwrap();
        assert_eq!(names, ["Lamp", "Fan"]);
    }

    #[test]
    fn device_name_with_delimiter_is_rejected() {
        let err = normalize_device_names(&["Lamp | Fan"]).unwrap_err();
        assert!(matches!(err, HomeError::Validation(_)));
        assert!(normalize_device_names(&["Lamp|Fan"]).is_err());
    }

    #[tokio::test]
    async fn create_room_links_devices_to_room_and_user() {
        let ctx = TestContext::new().await;
        let user = ctx.register("ada@example.com").await.user;

        let detail = ctx.rooms().create_room(&user, "Floor 1", "Bedroom", &["Lamp", "Fan"]).await.unwrap();

        assert_eq!(detail.room.type_of_room, "Bedroom");
        assert_eq!(detail.room.floor_number, "Floor 1");
        assert_eq!(detail.room.user_id, user.id);
        assert_eq!(detail.device_names, "Lamp | Fan");
        let names: Vec<_> = detail.devices.iter().map(|d| d.device_name.as_str()).collect();
        assert_eq!(names, ["Lamp", "Fan"]);
        assert!(detail
            .devices
            .iter()
            .all(|d| d.room_id == detail.room.room_id && d.user_id == user.id && !d.device_status));

        assert_eq!(ctx.count("rooms").await, 1);
        assert_eq!(ctx.count("devices").await, 2);
    }

    #[tokio::test]
    async fn create_room_on_unknown_floor_writes_nothing() {
        let ctx = TestContext::new().await;
        let user = ctx.register("ada@example.com").await.user;

        let err = ctx.rooms().create_room(&user, "Floor 9", "Attic", &["Lamp"]).await.unwrap_err();
        assert!(matches!(err, HomeError::Integrity(_)));
        assert_eq!(ctx.count("rooms").await, 0);
        assert_eq!(ctx.count("devices").await, 0);
    }

    #[tokio::test]
    async fn create_room_requires_room_type() {
        let ctx = TestContext::new().await;
        let user = ctx.register("ada@example.com").await.user;

        let err = ctx.rooms().create_room(&user, "Floor 1", "  ", &["Lamp"]).await.unwrap_err();
        assert!(matches!(err, HomeError::Validation(_)));
        assert_eq!(ctx.count("rooms").await, 0);
    }

    #[tokio::test]
    async fn room_without_devices_is_allowed() {
        let ctx = TestContext::new().await;
        let user = ctx.register("ada@example.com").await.user;

        let none: [&str; 0] = [];
        let detail = ctx.rooms().create_room(&user, "Floor 3", "Hallway", &none).await.unwrap();
        assert!(detail.devices.is_empty());
        assert_eq!(detail.device_names, "");
    }

    #[tokio::test]
    async fn list_rooms_is_scoped_to_owner_and_floor() {
        let ctx = TestContext::new().await;
        let alice = ctx.register("alice@example.com").await.user;
        let bob = ctx.register("bob@example.com").await.user;

        ctx.rooms().create_room(&alice, "Floor 2", "Study", &["Desk Lamp"]).await.unwrap();
        ctx.rooms().create_room(&alice, "Floor 1", "Kitchen", &["Kettle"]).await.unwrap();
        ctx.rooms().create_room(&bob, "Floor 2", "Gym", &["Treadmill", "Speaker"]).await.unwrap();

        let rooms = ctx.rooms().list_rooms(&alice, "Floor 2").await.unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].room.type_of_room, "Study");
        assert_eq!(rooms[0].device_names, "Desk Lamp");
        assert!(rooms.iter().all(|r| r.room.user_id == alice.id));

        let rooms = ctx.rooms().list_rooms(&bob, "Floor 2").await.unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].devices.len(), 2);

        assert!(ctx.rooms().list_rooms(&bob, "Floor 1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn room_detail_never_leaks_across_accounts() {
        let ctx = TestContext::new().await;
        let alice = ctx.register("alice@example.com").await.user;
        let bob = ctx.register("bob@example.com").await.user;

        let room = ctx.rooms().create_room(&alice, "Floor 1", "Bedroom", &["Lamp"]).await.unwrap();

        let detail = ctx.rooms().get_room_detail(&alice, room.room.room_id).await.unwrap();
        assert_eq!(detail.devices.len(), 1);

        let err = ctx.rooms().get_room_detail(&bob, room.room.room_id).await.unwrap_err();
        assert!(matches!(err, HomeError::NotFound(_)));
        assert_eq!(err.to_string(), ROOM_NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_room_removes_devices() {
        let ctx = TestContext::new().await;
        let user = ctx.register("ada@example.com").await.user;

        let doomed = ctx.rooms().create_room(&user, "Floor 1", "Bedroom", &["Lamp", "Fan"]).await.unwrap();
        let kept = ctx.rooms().create_room(&user, "Floor 1", "Office", &["Monitor"]).await.unwrap();

        ctx.rooms().delete_room(&user, doomed.room.room_id).await.unwrap();

        assert_eq!(ctx.count("rooms").await, 1);
        let devices = ctx.rooms().list_devices(&user).await.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].room_id, kept.room.room_id);

        let err = ctx.rooms().get_room_detail(&user, doomed.room.room_id).await.unwrap_err();
        assert!(matches!(err, HomeError::NotFound(_)));
    }

    #[tokio::test]
    async fn deleting_someone_elses_room_changes_nothing() {
        let ctx = TestContext::new().await;
        let alice = ctx.register("alice@example.com").await.user;
        let bob = ctx.register("bob@example.com").await.user;

        let room = ctx.rooms().create_room(&alice, "Floor 1", "Bedroom", &["Lamp", "Fan"]).await.unwrap();

        let err = ctx.rooms().delete_room(&bob, room.room.room_id).await.unwrap_err();
        assert!(matches!(err, HomeError::NotFound(_)));
        assert_eq!(ctx.count("rooms").await, 1);
        assert_eq!(ctx.count("devices").await, 2);

        let err = ctx.rooms().delete_room(&alice, room.room.room_id + 100).await.unwrap_err();
        assert!(matches!(err, HomeError::NotFound(_)));
    }

    #[tokio::test]
    async fn floor_summary_counts_rooms_and_devices() {
        let ctx = TestContext::new().await;
        let user = ctx.register("ada@example.com").await.user;

        ctx.rooms().create_room(&user, "Floor 1", "Bedroom", &["Lamp", "Fan"]).await.unwrap();
        ctx.rooms().create_room(&user, "Floor 1", "Bathroom", &["Heater"]).await.unwrap();
        ctx.rooms().create_room(&user, "Floor 3", "Attic", &["Dehumidifier"]).await.unwrap();

        let summary = ctx.rooms().floor_summary(&user).await.unwrap();
        let counts: Vec<_> = summary
            .iter()
            .map(|f| (f.floor_number.as_str(), f.room_count, f.device_count))
            .collect();
        assert_eq!(counts, [("Floor 1", 2, 3), ("Floor 2", 0, 0), ("Floor 3", 1, 1)]);
    }
}
