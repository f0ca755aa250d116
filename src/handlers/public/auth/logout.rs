// handlers/public/auth/logout.rs - GET /logout

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};

use crate::error::ApiError;
use crate::middleware::auth::LOGIN_PATH;
use crate::middleware::{clear_session_cookie, session_token_from_headers};
use crate::state::AppState;

/// GET /logout - always ends at /login with the cookie cleared, whether or not
/// a live session was presented.
pub async fn logout_get(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let security = &state.config.security;
    let token = session_token_from_headers(&headers, &security.cookie_name);

    state.accounts().logout(token.as_deref()).await?;

    Ok(([(header::SET_COOKIE, clear_session_cookie(security))], Redirect::to(LOGIN_PATH)).into_response())
}
