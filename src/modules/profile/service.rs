use tracing::instrument;
use wayfare_core::AppError;
use wayfare_models::{
    Document, DriverProfile, ProfileResponse, PublicUser, SetAvailabilityRequest,
    UpdateDriverProfileRequest, UpdateProfileRequest, User, UserId, UserRole,
    UploadDocumentRequest,
};

use crate::store::{NewDocument, UserChanges, UserStore};

const DRIVER_PROFILE_NOT_FOUND: &str = "Driver profile not found";

pub struct ProfileService;

impl ProfileService {
    async fn profile_for(store: &dyn UserStore, user: User) -> Result<ProfileResponse, AppError> {
        let (driver_profile, rider_profile) = match user.role {
            UserRole::Driver => (store.find_driver_profile(user.id).await?, None),
            UserRole::Rider => (None, store.find_rider_profile(user.id).await?),
            UserRole::Admin => (None, None),
        };

        Ok(ProfileResponse {
            user: PublicUser::from(user),
            driver_profile,
            rider_profile,
        })
    }

    #[instrument(skip(store))]
    pub async fn get_profile(
        store: &dyn UserStore,
        user_id: UserId,
    ) -> Result<ProfileResponse, AppError> {
        let user = store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        Self::profile_for(store, user).await
    }

    #[instrument(skip(store, dto))]
    pub async fn update_profile(
        store: &dyn UserStore,
        user_id: UserId,
        dto: UpdateProfileRequest,
    ) -> Result<ProfileResponse, AppError> {
        let user = store
            .update_user(user_id, UserChanges::from(dto))
            .await
            .map_err(|e| e.into_app_error("User not found"))?;

        Self::profile_for(store, user).await
    }

    #[instrument(skip(store))]
    pub async fn get_driver_profile(
        store: &dyn UserStore,
        user_id: UserId,
    ) -> Result<DriverProfile, AppError> {
        store
            .find_driver_profile(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!(DRIVER_PROFILE_NOT_FOUND)))
    }

    #[instrument(skip(store, dto))]
    pub async fn update_driver_profile(
        store: &dyn UserStore,
        user_id: UserId,
        dto: UpdateDriverProfileRequest,
    ) -> Result<DriverProfile, AppError> {
        store
            .update_driver_profile(user_id, dto.into())
            .await
            .map_err(|e| e.into_app_error(DRIVER_PROFILE_NOT_FOUND))
    }

    /// Going online requires an approved profile; going offline is always allowed.
    /// The store enforces the approval check atomically with the write.
    #[instrument(skip(store))]
    pub async fn set_availability(
        store: &dyn UserStore,
        user_id: UserId,
        dto: SetAvailabilityRequest,
    ) -> Result<DriverProfile, AppError> {
        store
            .set_driver_availability(user_id, dto.is_available)
            .await
            .map_err(|e| e.into_app_error(DRIVER_PROFILE_NOT_FOUND))
    }

    #[instrument(skip(store, dto), fields(doc_type = %dto.doc_type))]
    pub async fn upload_document(
        store: &dyn UserStore,
        user_id: UserId,
        dto: UploadDocumentRequest,
    ) -> Result<Document, AppError> {
        store
            .add_driver_document(
                user_id,
                NewDocument {
                    doc_type: dto.doc_type,
                    file_url: dto.file_url,
                },
            )
            .await
            .map_err(|e| e.into_app_error(DRIVER_PROFILE_NOT_FOUND))
    }

    #[instrument(skip(store))]
    pub async fn list_documents(
        store: &dyn UserStore,
        user_id: UserId,
    ) -> Result<Vec<Document>, AppError> {
        store
            .list_driver_documents(user_id)
            .await
            .map_err(|e| e.into_app_error(DRIVER_PROFILE_NOT_FOUND))
    }
}
