use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;
use wayfare_core::{AppError, ErrorResponse};
use wayfare_models::{
    Document, DriverProfile, ProfileResponse, SetAvailabilityRequest, UpdateDriverProfileRequest,
    UpdateProfileRequest, UploadDocumentRequest,
};

use super::service::ProfileService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Get the caller's identity and role profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Account not active", body = ErrorResponse)
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = %auth_user.user_id()))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = ProfileService::get_profile(state.store.as_ref(), auth_user.user_id()).await?;
    Ok(Json(profile))
}

/// Update the caller's name or phone number
#[utoipa::path(
    patch,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = %auth_user.user_id()))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile =
        ProfileService::update_profile(state.store.as_ref(), auth_user.user_id(), dto).await?;
    Ok(Json(profile))
}

/// Get the caller's driver profile
#[utoipa::path(
    get,
    path = "/api/profile/driver",
    responses(
        (status = 200, description = "Driver profile", body = DriverProfile),
        (status = 403, description = "Not a driver", body = ErrorResponse),
        (status = 404, description = "Driver profile not found", body = ErrorResponse)
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = %auth_user.user_id()))]
pub async fn get_driver_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<DriverProfile>, AppError> {
    let profile =
        ProfileService::get_driver_profile(state.store.as_ref(), auth_user.user_id()).await?;
    Ok(Json(profile))
}

/// Update license and vehicle details
#[utoipa::path(
    patch,
    path = "/api/profile/driver",
    request_body = UpdateDriverProfileRequest,
    responses(
        (status = 200, description = "Driver profile updated", body = DriverProfile),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not a driver", body = ErrorResponse)
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = %auth_user.user_id()))]
pub async fn update_driver_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateDriverProfileRequest>,
) -> Result<Json<DriverProfile>, AppError> {
    let profile =
        ProfileService::update_driver_profile(state.store.as_ref(), auth_user.user_id(), dto)
            .await?;
    Ok(Json(profile))
}

/// Upload a verification document
#[utoipa::path(
    post,
    path = "/api/profile/driver/documents",
    request_body = UploadDocumentRequest,
    responses(
        (status = 201, description = "Document added", body = Document),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not a driver", body = ErrorResponse)
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = %auth_user.user_id()))]
pub async fn upload_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UploadDocumentRequest>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let document =
        ProfileService::upload_document(state.store.as_ref(), auth_user.user_id(), dto).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// List uploaded documents in upload order
#[utoipa::path(
    get,
    path = "/api/profile/driver/documents",
    responses(
        (status = 200, description = "Documents", body = Vec<Document>),
        (status = 403, description = "Not a driver", body = ErrorResponse)
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = %auth_user.user_id()))]
pub async fn list_documents(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Document>>, AppError> {
    let documents =
        ProfileService::list_documents(state.store.as_ref(), auth_user.user_id()).await?;
    Ok(Json(documents))
}

/// Go online or offline
#[utoipa::path(
    patch,
    path = "/api/profile/driver/availability",
    request_body = SetAvailabilityRequest,
    responses(
        (status = 200, description = "Availability updated", body = DriverProfile),
        (status = 403, description = "Not a driver, or not yet approved", body = ErrorResponse)
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = %auth_user.user_id()))]
pub async fn set_availability(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<SetAvailabilityRequest>,
) -> Result<Json<DriverProfile>, AppError> {
    let profile =
        ProfileService::set_availability(state.store.as_ref(), auth_user.user_id(), dto).await?;
    Ok(Json(profile))
}
