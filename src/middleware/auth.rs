use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::config::SecurityConfig;
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Where anonymous requests to protected routes are sent.
pub const LOGIN_PATH: &str = "/login";

/// Identity resolved from the session, injected for protected handlers
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Session middleware for protected routes.
///
/// Resolves the session token once per request and inserts [`CurrentUser`].
/// Anonymous callers are redirected to the login page rather than refused
/// with an error status.
pub async fn require_session(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let Some(token) = session_token_from_headers(request.headers(), &state.config.security.cookie_name) else {
        tracing::debug!(path = %request.uri().path(), "No session token, redirecting to login");
        return Redirect::to(LOGIN_PATH).into_response();
    };

    match state.accounts().resolve_current_user(&token).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Ok(None) => {
            tracing::debug!(path = %request.uri().path(), "Session not valid, redirecting to login");
            // Drop the dead cookie on the way out
            let clear = clear_session_cookie(&state.config.security);
            ([(header::SET_COOKIE, clear)], Redirect::to(LOGIN_PATH)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Session token from `Authorization: Bearer ...`, falling back to the session
/// cookie.
pub fn session_token_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value carrying a session token for `max_age_secs`.
pub fn session_cookie(security: &SecurityConfig, token: &str, max_age_secs: i64) -> HeaderValue {
    build_cookie(security, token, max_age_secs.max(0))
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(security: &SecurityConfig) -> HeaderValue {
    build_cookie(security, "", 0)
}

fn build_cookie(security: &SecurityConfig, value: &str, max_age_secs: i64) -> HeaderValue {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        security.cookie_name, value, max_age_secs
    );
    if security.cookie_secure {
        cookie.push_str("; Secure");
    }
    // Tokens are base64url and the cookie name comes from config; both are
    // header-safe, so this only fails on a misconfigured cookie name.
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static("smarthome_session=; Path=/; Max-Age=0"))
}
