use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::state::AppState;
use super::watcher_handlers;

pub fn watcher_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(watcher_handlers::create_watcher))
        .route(
            "/:id",
            get(watcher_handlers::get_watcher).delete(watcher_handlers::delete_watcher),
        )
        .route("/:id/toggle", patch(watcher_handlers::toggle_watcher))
        .route("/:id/active", put(watcher_handlers::set_watcher_active))
        .route("/:id/slots", get(watcher_handlers::get_notified_slots))
}
