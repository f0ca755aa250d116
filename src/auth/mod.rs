pub mod password;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

pub use password::{hash_password, verify_password, PasswordError};

/// Claims carried by the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    /// Session row id; revoked by deleting the row
    pub sid: Uuid,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Session secret is not configured")]
    InvalidSecret,

    #[error("Session token generation failed: {0}")]
    Generation(String),

    #[error("Invalid session token: {0}")]
    Invalid(String),
}

/// Signing material for session tokens, derived once from `SecurityConfig`.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    pub fn from_config(security: &SecurityConfig) -> Result<Self, TokenError> {
        if security.session_secret.is_empty() {
            return Err(TokenError::InvalidSecret);
        }
        let secret = security.session_secret.as_bytes();
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifetime: Duration::hours(security.session_expiry_hours as i64),
        })
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Sign a token for `session_id`, valid until `issued_at + lifetime`.
    pub fn issue(&self, user_id: i64, session_id: Uuid, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id,
            sid: session_id,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.lifetime).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    /// Check signature and expiry. Session revocation is checked by the caller.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}
