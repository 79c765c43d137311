use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use super::controller::{
    approve_driver, list_drivers, list_pending_drivers, list_users, reject_driver,
    update_user_status,
};
use crate::middleware::role::{require_active, require_admin};
use crate::state::AppState;

pub fn init_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/drivers", get(list_drivers))
        .route("/drivers/pending", get(list_pending_drivers))
        .route("/drivers/{id}/approve", post(approve_driver))
        .route("/drivers/{id}/reject", post(reject_driver))
        .route("/users", get(list_users))
        .route("/users/{id}/status", patch(update_user_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_active))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}
