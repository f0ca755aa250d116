use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, SessionKeys};
use crate::database::models::{Floor, FloorSlot, Session, User};
use crate::database::DatabaseError;

use super::error::{AuthFailure, HomeError, HomeResult};

pub const MIN_EMAIL_LENGTH: usize = 4;
pub const MIN_PASSWORD_LENGTH: usize = 7;

const EMAIL_TAKEN: &str = "Email already exists.";

/// Registration input.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub email: String,
    pub first_name: String,
    pub password: String,
    pub confirm_password: String,
}

/// A freshly opened session and the signed token that names it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionToken {
    pub token: String,
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignedIn {
    pub user: User,
    pub session: SessionToken,
}

/// Check registration input. Rules are applied in a fixed order and the first
/// failure wins.
pub fn validate_new_account(account: &NewAccount) -> HomeResult<()> {
    if account.email.trim().chars().count() < MIN_EMAIL_LENGTH {
        return Err(HomeError::validation("Email must be greater than 3 characters."));
    }
    if account.password != account.confirm_password {
        return Err(HomeError::validation("Passwords don't match."));
    }
    if account.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(HomeError::validation("Password must be at least 7 characters."));
    }
    Ok(())
}

/// Registration, login, logout and session resolution.
pub struct AccountService {
    pool: SqlitePool,
    keys: SessionKeys,
}

impl AccountService {
    pub fn new(pool: SqlitePool, keys: SessionKeys) -> Self {
        Self { pool, keys }
    }

    /// Create the user with its three floors and open a session, all in one
    /// transaction.
    pub async fn register(&self, account: &NewAccount) -> HomeResult<SignedIn> {
        let password_hash = self.prepare_account(account).await?;

        let mut tx = self.pool.begin().await?;
        let user = insert_account(&mut tx, account, &password_hash).await?;
        let session = self.open_session(&mut tx, user.id).await?;
        tx.commit().await?;

        info!(user_id = user.id, "Registered account");
        Ok(SignedIn { user, session })
    }

    /// Create the user with its three floors without signing in.
    pub async fn create_account(&self, account: &NewAccount) -> HomeResult<User> {
        let password_hash = self.prepare_account(account).await?;

        let mut tx = self.pool.begin().await?;
        let user = insert_account(&mut tx, account, &password_hash).await?;
        tx.commit().await?;

        info!(user_id = user.id, "Created account");
        Ok(user)
    }

    async fn prepare_account(&self, account: &NewAccount) -> HomeResult<String> {
        validate_new_account(account)?;
        if self.find_by_email(&account.email).await?.is_some() {
            return Err(HomeError::validation(EMAIL_TAKEN));
        }
        Ok(hash_password(&account.password)?)
    }

    pub async fn login(&self, email: &str, password: &str) -> HomeResult<SignedIn> {
        let user = match self.find_by_email(email).await? {
            Some(user) => user,
            None => {
                warn!("Login refused: unknown email");
                return Err(HomeError::Auth(AuthFailure::EmailNotFound));
            }
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = user.id, "Login refused: incorrect password");
            return Err(HomeError::Auth(AuthFailure::IncorrectPassword));
        }

        let mut tx = self.pool.begin().await?;
        let session = self.open_session(&mut tx, user.id).await?;
        tx.commit().await?;

        info!(user_id = user.id, "User logged in");
        Ok(SignedIn { user, session })
    }

    /// Revoke the session named by `token`. Missing, malformed, expired or
    /// already revoked tokens are not errors.
    pub async fn logout(&self, token: Option<&str>) -> HomeResult<()> {
        let Some(claims) = token.and_then(|t| self.keys.verify(t).ok()) else {
            debug!("Logout without a live session");
            return Ok(());
        };

        let result = sqlx::query("DELETE FROM sessions WHERE session_id = ? AND user_id = ?")
            .bind(claims.sid)
            .bind(claims.sub)
            .execute(&self.pool)
            .await?;

        info!(user_id = claims.sub, revoked = result.rows_affected(), "User logged out");
        Ok(())
    }

    /// Map a session token to its user. `Ok(None)` means anonymous.
    pub async fn resolve_current_user(&self, token: &str) -> HomeResult<Option<User>> {
        let claims = match self.keys.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!("Rejected session token: {}", e);
                return Ok(None);
            }
        };

        let session: Option<Session> = sqlx::query_as(
            "SELECT session_id, user_id, created_at, expires_at FROM sessions WHERE session_id = ? AND user_id = ?",
        )
        .bind(claims.sid)
        .bind(claims.sub)
        .fetch_optional(&self.pool)
        .await?;

        match session {
            Some(session) if !session.is_expired_at(Utc::now()) => self.find_by_id(session.user_id).await,
            Some(_) => {
                debug!(user_id = claims.sub, "Session expired");
                Ok(None)
            }
            None => {
                debug!(user_id = claims.sub, "Session revoked or unknown");
                Ok(None)
            }
        }
    }

    pub async fn find_by_email(&self, email: &str) -> HomeResult<Option<User>> {
        let user = sqlx::query_as(
            "SELECT id, email, password_hash, first_name, created_at FROM users WHERE email = ?",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: i64) -> HomeResult<Option<User>> {
        let user = sqlx::query_as(
            "SELECT id, email, password_hash, first_name, created_at FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn floors(&self, user: &User) -> HomeResult<Vec<Floor>> {
        let floors = sqlx::query_as(
            "SELECT floor_id, floor_number, user_id FROM floors WHERE user_id = ? ORDER BY floor_number",
        )
        .bind(user.id)
        .fetch_all(&self.pool)
        .await?;
        Ok(floors)
    }

    /// Drop session rows past their expiry. Returns how many were removed.
    pub async fn purge_expired_sessions(&self) -> HomeResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE julianday(expires_at) <= julianday(?)")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn open_session(&self, tx: &mut Transaction<'_, Sqlite>, user_id: i64) -> HomeResult<SessionToken> {
        let session_id = Uuid::new_v4();
        let now = Utc::now();
        let expires_at = now + self.keys.lifetime();
        let token = self.keys.issue(user_id, session_id, now)?;

        sqlx::query("INSERT INTO sessions (session_id, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)")
            .bind(session_id)
            .bind(user_id)
            .bind(now)
            .bind(expires_at)
            .execute(&mut **tx)
            .await?;

        Ok(SessionToken {
            token,
            session_id,
            expires_at,
        })
    }
}

async fn insert_account(
    tx: &mut Transaction<'_, Sqlite>,
    account: &NewAccount,
    password_hash: &str,
) -> HomeResult<User> {
    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (email, password_hash, first_name, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, email, password_hash, first_name, created_at
        "#,
    )
    .bind(account.email.trim())
    .bind(password_hash)
    .bind(account.first_name.trim())
    .bind(Utc::now())
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| {
        let e = DatabaseError::from(e);
        if e.is_unique_violation() {
            HomeError::validation(EMAIL_TAKEN)
        } else {
            HomeError::Database(e)
        }
    })?;

    for slot in FloorSlot::ALL {
        sqlx::query("INSERT INTO floors (floor_number, user_id) VALUES (?, ?)")
            .bind(slot.label())
            .bind(user.id)
            .execute(&mut **tx)
            .await?;
    }

    Ok(user)
}
