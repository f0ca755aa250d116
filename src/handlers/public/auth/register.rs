// handlers/public/auth/register.rs - GET|POST /register

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
use crate::services::account_service::{MIN_EMAIL_LENGTH, MIN_PASSWORD_LENGTH};
use crate::services::NewAccount;
use crate::state::AppState;

use super::{form_descriptor, grant_session};

/// Registration form. The HTML form field names (`firstName`, `password1`,
/// `password2`) are accepted as aliases.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "password1")]
    pub password: String,
    #[serde(alias = "password2")]
    pub confirm_password: String,
}

impl From<RegisterRequest> for NewAccount {
    fn from(req: RegisterRequest) -> Self {
        NewAccount {
            email: req.email,
            first_name: req.first_name,
            password: req.password,
            confirm_password: req.confirm_password,
        }
    }
}

/// GET /register
pub async fn register_get() -> ApiResponse<Value> {
    form_descriptor(
        "/register",
        json!([
            { "name": "email", "type": "email", "min_length": MIN_EMAIL_LENGTH },
            { "name": "first_name", "type": "text" },
            { "name": "password", "type": "password", "min_length": MIN_PASSWORD_LENGTH },
            { "name": "confirm_password", "type": "password" },
        ]),
    )
}

/// POST /register - create the account, its three floors and a session
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;
    let account = NewAccount::from(req);

    let signed_in = state.accounts().register(&account).await?;

    Ok(grant_session(
        &state.config.security,
        signed_in,
        "Account created!",
        StatusCode::CREATED,
    ))
}
