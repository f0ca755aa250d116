// handlers/protected/automation.rs - GET /start

use axum::{extract::State, Extension};
use serde::Serialize;

use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HookStarted {
    pub message: &'static str,
    pub pid: Option<u32>,
}

/// Launch the configured automation hook without waiting for it.
pub async fn start(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<HookStarted> {
    let pid = state.hook.trigger(&user)?;
    Ok(ApiResponse::accepted(HookStarted { message: "Success", pid }))
}
