// handlers/public/auth/login.rs - GET|POST /login

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;

use super::{form_descriptor, grant_session};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// GET /login
pub async fn login_get() -> ApiResponse<Value> {
    form_descriptor(
        "/login",
        json!([
            { "name": "email", "type": "email" },
            { "name": "password", "type": "password" },
        ]),
    )
}

/// POST /login
///
/// Unknown email and wrong password are reported separately:
/// "Email does not exist." and "Incorrect password, try again." (both 401).
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;

    let signed_in = state.accounts().login(&req.email, &req.password).await?;

    Ok(grant_session(
        &state.config.security,
        signed_in,
        "Logged in successfully!",
        StatusCode::OK,
    ))
}
