use axum::{middleware, routing::get, Extension, Router};
use tower_http::trace::TraceLayer;

use crate::database::models::FloorSlot;
use crate::handlers::protected::rooms::{create_path, rooms_path};
use crate::handlers::{protected, public};
use crate::middleware::require_session;
use crate::state::AppState;

/// Build the full router over `state`.
pub fn app(state: AppState) -> Router {
    let request_logging = state.config.api.enable_request_logging;

    let router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .with_state(state);

    if request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/register", get(auth::register_get).post(auth::register_post))
        .route("/login", get(auth::login_get).post(auth::login_post))
        .route("/logout", get(auth::logout_get))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{automation, devices, help, home};

    let router = Router::new()
        .route("/home", get(home::home).post(home::home))
        .route("/devices", get(devices::list_devices))
        .route("/help_info", get(help::help_info))
        .route("/start", get(automation::start));

    FloorSlot::ALL
        .into_iter()
        .fold(router, |router, slot| router.merge(floor_routes(slot)))
        .route_layer(middleware::from_fn_with_state(state, require_session))
}

/// Room routes for one floor; handlers read the floor from `Extension<FloorSlot>`.
fn floor_routes(slot: FloorSlot) -> Router<AppState> {
    use protected::rooms;

    let list = rooms_path(slot);
    let detail = format!("{}/:room_id", list);
    let delete = format!("{}/:room_id/delete", list);

    Router::new()
        .route(&list, get(rooms::list_rooms))
        .route(&detail, get(rooms::room_detail))
        .route(&delete, get(rooms::delete_room).post(rooms::delete_room))
        .route(&create_path(slot), get(rooms::create_page).post(rooms::create_room))
        .layer(Extension(slot))
}
