use axum::{Router, middleware, routing::get};

use super::controller::{
    get_driver_profile, get_profile, list_documents, set_availability, update_driver_profile,
    update_profile, upload_document,
};
use crate::middleware::role::{require_active, require_driver};
use crate::state::AppState;

pub fn init_profile_router(state: AppState) -> Router<AppState> {
    let driver_routes = Router::new()
        .route("/", get(get_driver_profile).patch(update_driver_profile))
        .route("/documents", get(list_documents).post(upload_document))
        .route("/availability", axum::routing::patch(set_availability))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_driver));

    Router::new()
        .route("/", get(get_profile).patch(update_profile))
        .nest("/driver", driver_routes)
        .route_layer(middleware::from_fn_with_state(state, require_active))
}
