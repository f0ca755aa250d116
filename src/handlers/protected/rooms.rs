// handlers/protected/rooms.rs - Floor room pages
//
// GET      /floor-N-rooms-devices                   list rooms on floor N
// GET      /floor-N-rooms-devices/:room_id          room detail
// GET|POST /createpageN                             form descriptor / create room
// GET|POST /floor-N-rooms-devices/:room_id/delete   delete room and its devices

use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::database::models::{FloorSlot, RoomDetail};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::room_service::ROOM_NOT_FOUND;
use crate::state::AppState;

/// Listing path for a floor, e.g. `/floor-2-rooms-devices`.
pub fn rooms_path(slot: FloorSlot) -> String {
    format!("/floor-{}-rooms-devices", slot.number())
}

/// Creation path for a floor, e.g. `/createpage2`.
pub fn create_path(slot: FloorSlot) -> String {
    format!("/createpage{}", slot.number())
}

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub type_of_room: String,
    #[serde(default)]
    pub devices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FloorRooms {
    pub floor: &'static str,
    pub rooms: Vec<RoomDetail>,
}

#[derive(Debug, Serialize)]
pub struct RoomDeleted {
    pub message: &'static str,
    pub room_id: i64,
}

// Non-numeric ids can never name a room
fn room_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id).map_err(|_| ApiError::not_found(ROOM_NOT_FOUND))
}

pub async fn list_rooms(
    State(state): State<AppState>,
    Extension(slot): Extension<FloorSlot>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<FloorRooms> {
    let rooms = state.rooms().list_rooms(&user, slot.label()).await?;
    Ok(ApiResponse::success(FloorRooms {
        floor: slot.label(),
        rooms,
    }))
}

pub async fn room_detail(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<RoomDetail> {
    let room_id = room_id(path)?;
    let detail = state.rooms().get_room_detail(&user, room_id).await?;
    Ok(ApiResponse::success(detail))
}

pub async fn create_page(Extension(slot): Extension<FloorSlot>) -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "floor": slot.label(),
        "action": create_path(slot),
        "method": "POST",
        "fields": [
            { "name": "type_of_room", "type": "text", "required": true },
            { "name": "devices", "type": "list", "required": false },
        ],
    }))
}

/// Create a room on this floor. Responds 201 with the room and a `Location`
/// pointing at its detail page.
pub async fn create_room(
    State(state): State<AppState>,
    Extension(slot): Extension<FloorSlot>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<CreateRoomRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;

    let detail = state
        .rooms()
        .create_room(&user, slot.label(), &req.type_of_room, &req.devices)
        .await?;

    let location = format!("{}/{}", rooms_path(slot), detail.room.room_id);
    Ok(([(header::LOCATION, location)], ApiResponse::created(detail)).into_response())
}

pub async fn delete_room(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<RoomDeleted> {
    let room_id = room_id(path)?;
    state.rooms().delete_room(&user, room_id).await?;
    Ok(ApiResponse::success(RoomDeleted {
        message: "Room and associated devices deleted successfully!",
        room_id,
    }))
}
