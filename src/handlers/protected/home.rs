// handlers/protected/home.rs - GET|POST /home

use axum::{extract::State, Extension};
use serde::Serialize;

use crate::database::models::{FloorSummary, User};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HomeOverview {
    pub greeting: String,
    pub user: User,
    pub floors: Vec<FloorSummary>,
}

pub async fn home(State(state): State<AppState>, Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResult<HomeOverview> {
    let floors = state.rooms().floor_summary(&user).await?;

    Ok(ApiResponse::success(HomeOverview {
        greeting: format!("Hello, {}!", user.first_name),
        user,
        floors,
    }))
}
