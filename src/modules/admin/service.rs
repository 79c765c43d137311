use tracing::instrument;
use wayfare_core::{AppError, FieldError};
use wayfare_models::{
    DriverProfile, DriverProfileId, DriverStatus, DriverWithUser, PublicUser, RejectDriverRequest,
    UpdateUserStatusRequest, UserFilterParams, UserId,
};
use wayfare_observability::track_driver_review;

use crate::store::{UserChanges, UserStore};

const DRIVER_PROFILE_NOT_FOUND: &str = "Driver profile not found";

/// Parses a path id, reporting a malformed one as a field error on `id`.
pub fn parse_id<T: std::str::FromStr>(raw: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::validation(vec![FieldError::new("id", "Invalid id")]))
}

pub struct AdminService;

impl AdminService {
    #[instrument(skip(store))]
    pub async fn list_drivers(
        store: &dyn UserStore,
        status: Option<DriverStatus>,
    ) -> Result<Vec<DriverWithUser>, AppError> {
        Ok(store.list_drivers(status).await?)
    }

    #[instrument(skip(store))]
    pub async fn approve_driver(
        store: &dyn UserStore,
        id: DriverProfileId,
        admin_id: UserId,
    ) -> Result<DriverProfile, AppError> {
        let profile = store
            .approve_driver(id, admin_id)
            .await
            .map_err(|e| e.into_app_error(DRIVER_PROFILE_NOT_FOUND))?;

        track_driver_review("approved");
        tracing::info!(driver_profile_id = %id, admin_id = %admin_id, "Driver approved");
        Ok(profile)
    }

    #[instrument(skip(store, dto))]
    pub async fn reject_driver(
        store: &dyn UserStore,
        id: DriverProfileId,
        admin_id: UserId,
        dto: RejectDriverRequest,
    ) -> Result<DriverWithUser, AppError> {
        let rejected = store
            .reject_driver(id, admin_id, dto.reason)
            .await
            .map_err(|e| e.into_app_error(DRIVER_PROFILE_NOT_FOUND))?;

        track_driver_review("rejected");
        tracing::info!(
            driver_profile_id = %id,
            user_id = %rejected.user.id,
            admin_id = %admin_id,
            "Driver rejected"
        );
        Ok(rejected)
    }

    #[instrument(skip(store))]
    pub async fn list_users(
        store: &dyn UserStore,
        filter: UserFilterParams,
    ) -> Result<Vec<PublicUser>, AppError> {
        let users = store.list_users(&filter).await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    #[instrument(skip(store, dto), fields(status = %dto.status))]
    pub async fn update_user_status(
        store: &dyn UserStore,
        target: UserId,
        admin_id: UserId,
        dto: UpdateUserStatusRequest,
    ) -> Result<PublicUser, AppError> {
        if target == admin_id {
            return Err(AppError::forbidden("Admins cannot change their own status"));
        }

        let user = store
            .update_user(target, UserChanges::status(dto.status))
            .await
            .map_err(|e| e.into_app_error("User not found"))?;

        tracing::info!(user_id = %target, admin_id = %admin_id, status = %user.status, "User status updated");
        Ok(PublicUser::from(user))
    }
}
