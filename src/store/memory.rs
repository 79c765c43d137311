use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use wayfare_models::{
    Document, DocumentId, DocumentStatus, DriverProfile, DriverProfileId, DriverStatus,
    DriverWithUser, Email, PublicUser, RiderProfile, User, UserFilterParams, UserId, UserRole,
    UserStatus,
};

use super::{
    DriverProfileChanges, NOT_APPROVED_MESSAGE, NewDocument, NewUser, StoreError, StoreResult,
    UserChanges, UserStore,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    user_ids_by_email: HashMap<Email, UserId>,
    drivers: HashMap<UserId, DriverProfile>,
    riders: HashMap<UserId, RiderProfile>,
}

impl Tables {
    fn driver_by_id_mut(&mut self, id: DriverProfileId) -> Option<&mut DriverProfile> {
        self.drivers.values_mut().find(|p| p.id == id)
    }
}

/// In-process store. A single lock guards every table, so multi-record
/// mutations are applied under one write guard.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &Email) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .user_ids_by_email
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.user_ids_by_email.contains_key(&new_user.email) {
            return Err(StoreError::Conflict("Email already registered".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            phone_number: new_user.phone_number,
            role: new_user.role,
            status: new_user.status,
            email_verified: false,
            created_at: now,
            updated_at: now,
        };

        match user.role {
            UserRole::Driver => {
                tables
                    .drivers
                    .insert(user.id, DriverProfile::new_pending(user.id, now));
            }
            UserRole::Rider => {
                tables.riders.insert(user.id, RiderProfile::new(user.id, now));
            }
            UserRole::Admin => {}
        }
        tables.user_ids_by_email.insert(user.email.clone(), user.id);
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update_user(&self, id: UserId, changes: UserChanges) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        changes.apply(user);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn list_users(&self, filter: &UserFilterParams) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| filter.role.is_none_or(|role| u.role == role))
            .filter(|u| filter.status.is_none_or(|status| u.status == status))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn find_driver_profile(&self, user_id: UserId) -> StoreResult<Option<DriverProfile>> {
        Ok(self.tables.read().await.drivers.get(&user_id).cloned())
    }

    async fn find_driver_profile_by_id(
        &self,
        id: DriverProfileId,
    ) -> StoreResult<Option<DriverProfile>> {
        let tables = self.tables.read().await;
        Ok(tables.drivers.values().find(|p| p.id == id).cloned())
    }

    async fn find_rider_profile(&self, user_id: UserId) -> StoreResult<Option<RiderProfile>> {
        Ok(self.tables.read().await.riders.get(&user_id).cloned())
    }

    async fn update_driver_profile(
        &self,
        user_id: UserId,
        changes: DriverProfileChanges,
    ) -> StoreResult<DriverProfile> {
        let mut tables = self.tables.write().await;
        let profile = tables.drivers.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        changes.apply(profile);
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    async fn set_driver_availability(
        &self,
        user_id: UserId,
        is_available: bool,
    ) -> StoreResult<DriverProfile> {
        let mut tables = self.tables.write().await;
        let profile = tables.drivers.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        if is_available && !profile.is_approved() {
            return Err(StoreError::Forbidden(NOT_APPROVED_MESSAGE.to_string()));
        }
        profile.is_available = is_available;
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    async fn add_driver_document(
        &self,
        user_id: UserId,
        document: NewDocument,
    ) -> StoreResult<Document> {
        let mut tables = self.tables.write().await;
        let profile = tables.drivers.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        let now = Utc::now();
        let document = Document {
            id: DocumentId::new(),
            doc_type: document.doc_type,
            file_url: document.file_url,
            status: DocumentStatus::Pending,
            uploaded_at: now,
        };
        profile.documents.push(document.clone());
        profile.updated_at = now;
        Ok(document)
    }

    async fn list_driver_documents(&self, user_id: UserId) -> StoreResult<Vec<Document>> {
        let tables = self.tables.read().await;
        let profile = tables.drivers.get(&user_id).ok_or(StoreError::NotFound)?;
        Ok(profile.documents.clone())
    }

    async fn list_drivers(&self, status: Option<DriverStatus>) -> StoreResult<Vec<DriverWithUser>> {
        let tables = self.tables.read().await;
        let mut drivers: Vec<DriverWithUser> = tables
            .drivers
            .values()
            .filter(|p| status.is_none_or(|s| p.status == s))
            .filter_map(|profile| {
                tables.users.get(&profile.user_id).map(|user| DriverWithUser {
                    user: PublicUser::from(user),
                    driver_profile: profile.clone(),
                })
            })
            .collect();
        drivers.sort_by(|a, b| {
            a.driver_profile
                .created_at
                .cmp(&b.driver_profile.created_at)
                .then(a.driver_profile.id.cmp(&b.driver_profile.id))
        });
        Ok(drivers)
    }

    async fn approve_driver(
        &self,
        id: DriverProfileId,
        approver: UserId,
    ) -> StoreResult<DriverProfile> {
        let mut tables = self.tables.write().await;
        let profile = tables.driver_by_id_mut(id).ok_or(StoreError::NotFound)?;
        let now = Utc::now();
        profile.status = DriverStatus::Approved;
        profile.approved_by = Some(approver);
        profile.approved_at = Some(now);
        profile.rejection_reason = None;
        profile.updated_at = now;
        Ok(profile.clone())
    }

    async fn reject_driver(
        &self,
        id: DriverProfileId,
        approver: UserId,
        reason: String,
    ) -> StoreResult<DriverWithUser> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        // Check both records before touching either.
        let owner = tables
            .drivers
            .values()
            .find(|p| p.id == id)
            .map(|p| p.user_id)
            .ok_or(StoreError::NotFound)?;
        if !tables.users.contains_key(&owner) {
            return Err(StoreError::NotFound);
        }

        let profile = tables.driver_by_id_mut(id).ok_or(StoreError::NotFound)?;
        profile.status = DriverStatus::Rejected;
        profile.approved_by = Some(approver);
        profile.approved_at = Some(now);
        profile.rejection_reason = Some(reason);
        profile.is_available = false;
        profile.updated_at = now;
        let profile = profile.clone();

        let user = tables.users.get_mut(&owner).ok_or(StoreError::NotFound)?;
        user.status = UserStatus::Rejected;
        user.updated_at = now;

        Ok(DriverWithUser {
            user: PublicUser::from(&*user),
            driver_profile: profile,
        })
    }
}
