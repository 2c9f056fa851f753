use axum::{middleware, routing::get, Router};

use crate::state::AppState;
use super::{admin_handlers, admin_middleware::admin_authorization};

pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/watchers", get(admin_handlers::get_admin_overview))
        .route_layer(middleware::from_fn_with_state(state, admin_authorization))
}
