//! Role and account-status guards, applied with
//! `axum::middleware::from_fn_with_state`.
//!
//! ```rust,ignore
//! let admin_routes = Router::new()
//!     .route("/users", get(list_users))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_active))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use wayfare_core::AppError;
use wayfare_models::{UserRole, UserStatus};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Rejects the request with 403 unless the caller's role is one of `allowed_roles`.
pub async fn require_roles(
    state: AppState,
    req: Request,
    next: Next,
    allowed_roles: &[UserRole],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;

    if !allowed_roles.contains(&auth_user.role()) {
        tracing::warn!(
            user_id = %auth_user.user_id(),
            role = %auth_user.role(),
            "Role check failed"
        );
        return Err(AppError::forbidden("Insufficient permissions"));
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(state, req, next, &[UserRole::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub async fn require_driver(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(state, req, next, &[UserRole::Driver]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Re-reads the caller's identity and rejects anything not `active` with 403.
///
/// Token claims are not consulted for the status: a token issued before the
/// account was rejected or deactivated is still refused here.
pub async fn require_active(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;

    let user = state
        .store
        .find_user_by_id(auth_user.user_id())
        .await?
        .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

    if user.status != UserStatus::Active {
        return Err(AppError::forbidden(format!("Account is {}", user.status)));
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}
