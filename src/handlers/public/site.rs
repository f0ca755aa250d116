// handlers/public/site.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - landing document for anonymous visitors
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "SmartHome API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Manage the rooms and devices of a three-floor home",
            "endpoints": {
                "account": "/register, /login, /logout (public)",
                "home": "/home (session)",
                "floors": "/floor-{1,2,3}-rooms-devices[/:room_id[/delete]] (session)",
                "create": "/createpage{1,2,3} (session)",
                "devices": "/devices (session)",
                "help": "/help_info (session)",
                "automation": "/start (session)",
            }
        }
    }))
}

/// GET /health - store liveness
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": { "status": "degraded", "timestamp": now }
                })),
            )
        }
    }
}
