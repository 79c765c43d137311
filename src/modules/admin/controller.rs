use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use wayfare_core::{AppError, ErrorResponse};
use wayfare_models::{
    DriverFilterParams, DriverProfile, DriverStatus, DriverWithUser, PublicUser,
    RejectDriverRequest, UpdateUserStatusRequest, UserFilterParams,
};

use super::service::{AdminService, parse_id};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedQuery};

/// List drivers awaiting approval
#[utoipa::path(
    get,
    path = "/api/admin/drivers/pending",
    responses(
        (status = 200, description = "Pending drivers", body = Vec<DriverWithUser>),
        (status = 403, description = "Admin only", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn list_pending_drivers(
    State(state): State<AppState>,
) -> Result<Json<Vec<DriverWithUser>>, AppError> {
    let drivers =
        AdminService::list_drivers(state.store.as_ref(), Some(DriverStatus::PendingApproval))
            .await?;
    Ok(Json(drivers))
}

/// List drivers, optionally filtered by approval status
#[utoipa::path(
    get,
    path = "/api/admin/drivers",
    params(DriverFilterParams),
    responses(
        (status = 200, description = "Drivers", body = Vec<DriverWithUser>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn list_drivers(
    State(state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<DriverFilterParams>,
) -> Result<Json<Vec<DriverWithUser>>, AppError> {
    let drivers = AdminService::list_drivers(state.store.as_ref(), filter.status).await?;
    Ok(Json(drivers))
}

/// Approve a driver profile
#[utoipa::path(
    post,
    path = "/api/admin/drivers/{id}/approve",
    params(("id" = String, Path, description = "Driver profile ID")),
    responses(
        (status = 200, description = "Driver approved", body = DriverProfile),
        (status = 403, description = "Admin only", body = ErrorResponse),
        (status = 404, description = "Driver profile not found", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn approve_driver(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DriverProfile>, AppError> {
    let profile =
        AdminService::approve_driver(state.store.as_ref(), parse_id(&id)?, auth_user.user_id())
            .await?;
    Ok(Json(profile))
}

/// Reject a driver profile and lock the driver's account
#[utoipa::path(
    post,
    path = "/api/admin/drivers/{id}/reject",
    params(("id" = String, Path, description = "Driver profile ID")),
    request_body = RejectDriverRequest,
    responses(
        (status = 200, description = "Driver rejected", body = DriverWithUser),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse),
        (status = 404, description = "Driver profile not found", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn reject_driver(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<RejectDriverRequest>,
) -> Result<Json<DriverWithUser>, AppError> {
    let rejected = AdminService::reject_driver(
        state.store.as_ref(),
        parse_id(&id)?,
        auth_user.user_id(),
        dto,
    )
    .await?;
    Ok(Json(rejected))
}

/// List users, optionally filtered by role and status
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(UserFilterParams),
    responses(
        (status = 200, description = "Users", body = Vec<PublicUser>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<UserFilterParams>,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = AdminService::list_users(state.store.as_ref(), filter).await?;
    Ok(Json(users))
}

/// Set a user's account status
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/status",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = PublicUser),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Admin only, or own account", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_user_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateUserStatusRequest>,
) -> Result<Json<PublicUser>, AppError> {
    let user = AdminService::update_user_status(
        state.store.as_ref(),
        parse_id(&id)?,
        auth_user.user_id(),
        dto,
    )
    .await?;
    Ok(Json(user))
}
