use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::manager::DatabaseError;

/// One schema step. Statements run in order inside a single transaction.
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub statements: &'static [&'static str],
}

/// Floors are keyed on `(floor_id, user_id)` as well as `floor_id` so rooms can
/// reference both columns; the same holds for rooms and devices. A room can
/// therefore never point at another user's floor, and a device never at
/// another user's room.
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    statements: &[
        r#"
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            first_name TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE floors (
            floor_id INTEGER PRIMARY KEY AUTOINCREMENT,
            floor_number TEXT NOT NULL,
            user_id INTEGER NOT NULL REFERENCES users (id),
            UNIQUE (user_id, floor_number),
            UNIQUE (floor_id, user_id)
        )
        "#,
        r#"
        CREATE TABLE rooms (
            room_id INTEGER PRIMARY KEY AUTOINCREMENT,
            type_of_room TEXT NOT NULL,
            floor_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL REFERENCES users (id),
            created_at TEXT NOT NULL,
            UNIQUE (room_id, user_id),
            FOREIGN KEY (floor_id, user_id) REFERENCES floors (floor_id, user_id)
        )
        "#,
        "CREATE INDEX idx_rooms_user_floor ON rooms (user_id, floor_id)",
        r#"
        CREATE TABLE devices (
            device_id INTEGER PRIMARY KEY AUTOINCREMENT,
            device_name TEXT NOT NULL,
            device_status INTEGER NOT NULL DEFAULT 0,
            room_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL REFERENCES users (id),
            FOREIGN KEY (room_id, user_id) REFERENCES rooms (room_id, user_id) ON DELETE CASCADE
        )
        "#,
        "CREATE INDEX idx_devices_room ON devices (room_id)",
        "CREATE INDEX idx_devices_user ON devices (user_id)",
        r#"
        CREATE TABLE sessions (
            session_id BLOB PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users (id),
            created_at TEXT NOT NULL,
            expires_at TEXT NOT NULL
        )
        "#,
        "CREATE INDEX idx_sessions_user ON sessions (user_id)",
    ],
}];

/// Apply every migration newer than the recorded schema version.
///
/// Returns the number of migrations applied; zero when already current.
pub async fn apply_migrations(pool: &SqlitePool) -> Result<usize, DatabaseError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current = current_version(pool).await?;
    let mut applied = 0;

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let wrap = |source| DatabaseError::Migration {
            version: migration.version,
            name: migration.name,
            source,
        };

        let mut tx = pool.begin().await.map_err(wrap)?;
        for statement in migration.statements {
            sqlx::query(statement).execute(&mut *tx).await.map_err(wrap)?;
        }
        sqlx::query("INSERT INTO schema_migrations (version, name, applied_at) VALUES (?, ?, ?)")
            .bind(migration.version)
            .bind(migration.name)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(wrap)?;
        tx.commit().await.map_err(wrap)?;

        info!(version = migration.version, name = migration.name, "Applied migration");
        applied += 1;
    }

    if applied == 0 {
        debug!(version = current, "Schema already current");
    }
    Ok(applied)
}

/// Highest applied migration version, 0 for a fresh store.
pub async fn current_version(pool: &SqlitePool) -> Result<i64, DatabaseError> {
    let (version,): (i64,) = sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
        .fetch_one(pool)
        .await?;
    Ok(version)
}
