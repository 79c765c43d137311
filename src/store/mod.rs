//! Persistence boundary for identities and their role profiles.
//!
//! Handlers never touch storage directly: they receive an
//! `Arc<dyn UserStore>` through [`AppState`](crate::state::AppState) and go
//! through the operations below. Two backends exist:
//!
//! - [`MemoryStore`]: process-local maps behind one lock, used for tests and
//!   the default `memory` backend
//! - [`PgStore`]: PostgreSQL via `sqlx`

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;
use wayfare_core::AppError;
use wayfare_models::{
    Document, DocumentType, DriverProfile, DriverProfileId, DriverStatus, DriverWithUser, Email,
    RiderProfile, UpdateDriverProfileRequest, UpdateProfileRequest, User, UserFilterParams,
    UserId, UserRole, UserStatus, Vehicle,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    /// The record exists but its current state does not allow the change.
    #[error("{0}")]
    Forbidden(String),
    #[error("corrupt row: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Maps the error onto the HTTP error contract, using `not_found` as the
    /// message for a missing record.
    pub fn into_app_error(self, not_found: &str) -> AppError {
        match self {
            StoreError::NotFound => AppError::not_found(anyhow::anyhow!(not_found.to_string())),
            StoreError::Conflict(message) => AppError::conflict(anyhow::anyhow!(message)),
            StoreError::Forbidden(message) => AppError::forbidden(message),
            other => AppError::internal(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

pub const NOT_APPROVED_MESSAGE: &str = "Driver must be approved before going available";

/// Everything needed to create an identity. The store assigns the id and
/// timestamps and creates the matching role profile.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub role: UserRole,
    pub status: UserStatus,
}

/// Partial update of an identity; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub status: Option<UserStatus>,
}

impl UserChanges {
    pub fn status(status: UserStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    fn apply(self, user: &mut User) {
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
        if let Some(phone_number) = self.phone_number {
            user.phone_number = phone_number;
        }
        if let Some(status) = self.status {
            user.status = status;
        }
    }
}

impl From<UpdateProfileRequest> for UserChanges {
    fn from(dto: UpdateProfileRequest) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            phone_number: dto.phone_number,
            status: None,
        }
    }
}

/// Driver self-service fields. Vehicle attributes merge field by field.
#[derive(Debug, Clone, Default)]
pub struct DriverProfileChanges {
    pub license_number: Option<String>,
    pub license_expiry: Option<NaiveDate>,
    pub vehicle: Option<Vehicle>,
}

impl DriverProfileChanges {
    fn apply(self, profile: &mut DriverProfile) {
        if let Some(license_number) = self.license_number {
            profile.license_number = Some(license_number);
        }
        if let Some(license_expiry) = self.license_expiry {
            profile.license_expiry = Some(license_expiry);
        }
        if let Some(vehicle) = self.vehicle {
            let current = &mut profile.vehicle;
            current.make = vehicle.make.or(current.make.take());
            current.model = vehicle.model.or(current.model.take());
            current.year = vehicle.year.or(current.year);
            current.color = vehicle.color.or(current.color.take());
            current.plate_number = vehicle.plate_number.or(current.plate_number.take());
        }
    }
}

impl From<UpdateDriverProfileRequest> for DriverProfileChanges {
    fn from(dto: UpdateDriverProfileRequest) -> Self {
        Self {
            license_number: dto.license_number,
            license_expiry: dto.license_expiry,
            vehicle: dto.vehicle.map(|v| Vehicle {
                make: v.make,
                model: v.model,
                year: v.year,
                color: v.color,
                plate_number: v.plate_number,
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub doc_type: DocumentType,
    pub file_url: Option<String>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_id(&self, id: UserId) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &Email) -> StoreResult<Option<User>>;

    /// Creates the identity and, for riders and drivers, its role profile in
    /// one step. Fails with [`StoreError::Conflict`] if the email is taken.
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User>;

    async fn update_user(&self, id: UserId, changes: UserChanges) -> StoreResult<User>;

    /// Users ordered by creation time, optionally filtered by role and status.
    async fn list_users(&self, filter: &UserFilterParams) -> StoreResult<Vec<User>>;

    async fn find_driver_profile(&self, user_id: UserId) -> StoreResult<Option<DriverProfile>>;

    async fn find_driver_profile_by_id(
        &self,
        id: DriverProfileId,
    ) -> StoreResult<Option<DriverProfile>>;

    async fn find_rider_profile(&self, user_id: UserId) -> StoreResult<Option<RiderProfile>>;

    async fn update_driver_profile(
        &self,
        user_id: UserId,
        changes: DriverProfileChanges,
    ) -> StoreResult<DriverProfile>;

    /// Sets the availability flag. Going available is refused with
    /// [`StoreError::Forbidden`] unless the profile is approved at the moment
    /// of the write.
    async fn set_driver_availability(
        &self,
        user_id: UserId,
        is_available: bool,
    ) -> StoreResult<DriverProfile>;

    /// Appends a pending document to the end of the driver's document list.
    async fn add_driver_document(
        &self,
        user_id: UserId,
        document: NewDocument,
    ) -> StoreResult<Document>;

    async fn list_driver_documents(&self, user_id: UserId) -> StoreResult<Vec<Document>>;

    async fn list_drivers(&self, status: Option<DriverStatus>) -> StoreResult<Vec<DriverWithUser>>;

    async fn approve_driver(
        &self,
        id: DriverProfileId,
        approver: UserId,
    ) -> StoreResult<DriverProfile>;

    /// Rejects the profile and sets the owning identity to `rejected`. Either
    /// both records change or neither does.
    async fn reject_driver(
        &self,
        id: DriverProfileId,
        approver: UserId,
        reason: String,
    ) -> StoreResult<DriverWithUser>;
}
