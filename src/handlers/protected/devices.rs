// handlers/protected/devices.rs - GET /devices

use axum::{extract::State, Extension};

use crate::database::models::Device;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

/// Every device the caller owns, across all floors.
pub async fn list_devices(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Vec<Device>> {
    let devices = state.rooms().list_devices(&user).await?;
    Ok(ApiResponse::success(devices))
}
