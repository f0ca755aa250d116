// handlers/public/auth/mod.rs - Account handlers
//
// GET  /register, /login  - form descriptors
// POST /register, /login  - open a session and set the session cookie
// GET  /logout            - revoke the session and send the caller to /login

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::SecurityConfig;
use crate::database::models::User;
use crate::middleware::{session_cookie, ApiResponse};
use crate::services::SignedIn;

pub mod login;
pub mod logout;
pub mod register;

pub use login::{login_get, login_post};
pub use logout::logout_get;
pub use register::{register_get, register_post};

/// Body returned whenever a session is opened.
#[derive(Debug, Serialize)]
pub struct SessionGranted {
    pub message: &'static str,
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Respond with the session cookie set and the token echoed in the body for
/// clients that prefer the `Authorization` header.
pub(crate) fn grant_session(
    security: &SecurityConfig,
    signed_in: SignedIn,
    message: &'static str,
    status: StatusCode,
) -> Response {
    let max_age = (signed_in.session.expires_at - Utc::now()).num_seconds();
    let cookie = session_cookie(security, &signed_in.session.token, max_age);

    let body = SessionGranted {
        message,
        user: signed_in.user,
        token: signed_in.session.token,
        expires_at: signed_in.session.expires_at,
    };

    ([(header::SET_COOKIE, cookie)], ApiResponse::with_status(body, status)).into_response()
}

/// Describe a form: where it posts and which fields it takes.
pub(crate) fn form_descriptor(action: &str, fields: Value) -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "action": action,
        "method": "POST",
        "fields": fields,
    }))
}
