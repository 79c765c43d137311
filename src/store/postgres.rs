use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::instrument;
use wayfare_models::{
    Document, DocumentId, DocumentStatus, DriverProfile, DriverProfileId, DriverStatus,
    DriverWithUser, Email, PublicUser, RiderProfile, RiderProfileId, User, UserFilterParams,
    UserId, UserRole, UserStatus, Vehicle,
};

use super::{
    DriverProfileChanges, NOT_APPROVED_MESSAGE, NewDocument, NewUser, StoreError, StoreResult,
    UserChanges, UserStore,
};

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, phone_number, \
     role, status, email_verified, created_at, updated_at";

const DRIVER_COLUMNS: &str = "id, user_id, license_number, license_expiry, vehicle_make, \
     vehicle_model, vehicle_year, vehicle_color, vehicle_plate_number, is_available, status, \
     approved_by, approved_at, rejection_reason, created_at, updated_at";

const DOCUMENT_COLUMNS: &str = "id, driver_profile_id, doc_type, file_url, status, uploaded_at";

fn parse_tag<T>(value: &str) -> StoreResult<T>
where
    T: std::str::FromStr<Err = wayfare_models::UnknownVariant>,
{
    value
        .parse()
        .map_err(|e: wayfare_models::UnknownVariant| StoreError::Corrupt(e.to_string()))
}

fn map_unique_violation(err: sqlx::Error) -> StoreError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            StoreError::Conflict("Email already registered".to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[derive(FromRow)]
struct UserRow {
    id: UserId,
    email: Email,
    password_hash: String,
    first_name: String,
    last_name: String,
    phone_number: String,
    role: String,
    status: String,
    email_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> StoreResult<Self> {
        Ok(User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            phone_number: row.phone_number,
            role: parse_tag::<UserRole>(&row.role)?,
            status: parse_tag::<UserStatus>(&row.status)?,
            email_verified: row.email_verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct DriverRow {
    id: DriverProfileId,
    user_id: UserId,
    license_number: Option<String>,
    license_expiry: Option<NaiveDate>,
    vehicle_make: Option<String>,
    vehicle_model: Option<String>,
    vehicle_year: Option<i32>,
    vehicle_color: Option<String>,
    vehicle_plate_number: Option<String>,
    is_available: bool,
    status: String,
    approved_by: Option<UserId>,
    approved_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DriverRow {
    fn into_profile(self, documents: Vec<Document>) -> StoreResult<DriverProfile> {
        Ok(DriverProfile {
            id: self.id,
            user_id: self.user_id,
            license_number: self.license_number,
            license_expiry: self.license_expiry,
            vehicle: Vehicle {
                make: self.vehicle_make,
                model: self.vehicle_model,
                year: self.vehicle_year,
                color: self.vehicle_color,
                plate_number: self.vehicle_plate_number,
            },
            is_available: self.is_available,
            status: parse_tag::<DriverStatus>(&self.status)?,
            approved_by: self.approved_by,
            approved_at: self.approved_at,
            rejection_reason: self.rejection_reason,
            documents,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct DocumentRow {
    id: DocumentId,
    driver_profile_id: DriverProfileId,
    doc_type: String,
    file_url: Option<String>,
    status: String,
    uploaded_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = StoreError;

    fn try_from(row: DocumentRow) -> StoreResult<Self> {
        Ok(Document {
            id: row.id,
            doc_type: parse_tag(&row.doc_type)?,
            file_url: row.file_url,
            status: parse_tag::<DocumentStatus>(&row.status)?,
            uploaded_at: row.uploaded_at,
        })
    }
}

#[derive(FromRow)]
struct RiderRow {
    id: RiderProfileId,
    user_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// PostgreSQL-backed store. Multi-record writes run inside a transaction.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn documents_for(
        &self,
        profile_ids: &[DriverProfileId],
    ) -> StoreResult<HashMap<DriverProfileId, Vec<Document>>> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM driver_documents \
             WHERE driver_profile_id = ANY($1) ORDER BY position"
        ))
        .bind(profile_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_profile: HashMap<DriverProfileId, Vec<Document>> = HashMap::new();
        for row in rows {
            let profile_id = row.driver_profile_id;
            by_profile
                .entry(profile_id)
                .or_default()
                .push(Document::try_from(row)?);
        }
        Ok(by_profile)
    }

    async fn hydrate(&self, row: DriverRow) -> StoreResult<DriverProfile> {
        let mut documents = self.documents_for(&[row.id]).await?;
        let docs = documents.remove(&row.id).unwrap_or_default();
        row.into_profile(docs)
    }

    async fn driver_row_by_user(&self, user_id: UserId) -> StoreResult<Option<DriverRow>> {
        Ok(sqlx::query_as::<_, DriverRow>(&format!(
            "SELECT {DRIVER_COLUMNS} FROM driver_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn stamp_review(
        tx: &mut Transaction<'_, Postgres>,
        id: DriverProfileId,
        status: DriverStatus,
        approver: UserId,
        reason: Option<String>,
    ) -> StoreResult<DriverRow> {
        sqlx::query_as::<_, DriverRow>(&format!(
            "UPDATE driver_profiles SET status = $2, approved_by = $3, approved_at = NOW(), \
             rejection_reason = $4, \
             is_available = CASE WHEN $2 = 'approved' THEN is_available ELSE FALSE END, \
             updated_at = NOW() \
             WHERE id = $1 RETURNING {DRIVER_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(approver)
        .bind(reason)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl UserStore for PgStore {
    #[instrument(skip(self))]
    async fn find_user_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &Email) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    #[instrument(skip(self, new_user), fields(email = %new_user.email, role = %new_user.role))]
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, phone_number, role, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {USER_COLUMNS}"
        ))
        .bind(UserId::new())
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.phone_number)
        .bind(new_user.role.as_str())
        .bind(new_user.status.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;
        let user = User::try_from(row)?;

        match user.role {
            UserRole::Driver => {
                sqlx::query("INSERT INTO driver_profiles (id, user_id, status) VALUES ($1, $2, $3)")
                    .bind(DriverProfileId::new())
                    .bind(user.id)
                    .bind(DriverStatus::PendingApproval.as_str())
                    .execute(&mut *tx)
                    .await?;
            }
            UserRole::Rider => {
                sqlx::query("INSERT INTO rider_profiles (id, user_id) VALUES ($1, $2)")
                    .bind(RiderProfileId::new())
                    .bind(user.id)
                    .execute(&mut *tx)
                    .await?;
            }
            UserRole::Admin => {}
        }

        tx.commit().await?;
        Ok(user)
    }

    #[instrument(skip(self, changes))]
    async fn update_user(&self, id: UserId, changes: UserChanges) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET \
             first_name = COALESCE($2, first_name), \
             last_name = COALESCE($3, last_name), \
             phone_number = COALESCE($4, phone_number), \
             status = COALESCE($5, status), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.phone_number)
        .bind(changes.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        User::try_from(row)
    }

    #[instrument(skip(self))]
    async fn list_users(&self, filter: &UserFilterParams) -> StoreResult<Vec<User>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE ($1::TEXT IS NULL OR role = $1) AND ($2::TEXT IS NULL OR status = $2) \
             ORDER BY created_at, id"
        ))
        .bind(filter.role.map(|r| r.as_str()))
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(User::try_from)
        .collect()
    }

    #[instrument(skip(self))]
    async fn find_driver_profile(&self, user_id: UserId) -> StoreResult<Option<DriverProfile>> {
        match self.driver_row_by_user(user_id).await? {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn find_driver_profile_by_id(
        &self,
        id: DriverProfileId,
    ) -> StoreResult<Option<DriverProfile>> {
        let row = sqlx::query_as::<_, DriverRow>(&format!(
            "SELECT {DRIVER_COLUMNS} FROM driver_profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn find_rider_profile(&self, user_id: UserId) -> StoreResult<Option<RiderProfile>> {
        let row = sqlx::query_as::<_, RiderRow>(
            "SELECT id, user_id, created_at, updated_at FROM rider_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| RiderProfile {
            id: r.id,
            user_id: r.user_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }))
    }

    #[instrument(skip(self, changes))]
    async fn update_driver_profile(
        &self,
        user_id: UserId,
        changes: DriverProfileChanges,
    ) -> StoreResult<DriverProfile> {
        let vehicle = changes.vehicle.unwrap_or_default();
        let row = sqlx::query_as::<_, DriverRow>(&format!(
            "UPDATE driver_profiles SET \
             license_number = COALESCE($2, license_number), \
             license_expiry = COALESCE($3, license_expiry), \
             vehicle_make = COALESCE($4, vehicle_make), \
             vehicle_model = COALESCE($5, vehicle_model), \
             vehicle_year = COALESCE($6, vehicle_year), \
             vehicle_color = COALESCE($7, vehicle_color), \
             vehicle_plate_number = COALESCE($8, vehicle_plate_number), \
             updated_at = NOW() \
             WHERE user_id = $1 RETURNING {DRIVER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(changes.license_number)
        .bind(changes.license_expiry)
        .bind(vehicle.make)
        .bind(vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.color)
        .bind(vehicle.plate_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        self.hydrate(row).await
    }

    #[instrument(skip(self))]
    async fn set_driver_availability(
        &self,
        user_id: UserId,
        is_available: bool,
    ) -> StoreResult<DriverProfile> {
        // Approval is checked in the same statement as the write.
        let row = sqlx::query_as::<_, DriverRow>(&format!(
            "UPDATE driver_profiles SET is_available = $2, updated_at = NOW() \
             WHERE user_id = $1 AND (NOT $2 OR status = $3) RETURNING {DRIVER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(is_available)
        .bind(DriverStatus::Approved.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => self.hydrate(row).await,
            None => match self.driver_row_by_user(user_id).await? {
                Some(_) => Err(StoreError::Forbidden(NOT_APPROVED_MESSAGE.to_string())),
                None => Err(StoreError::NotFound),
            },
        }
    }

    #[instrument(skip(self, document))]
    async fn add_driver_document(
        &self,
        user_id: UserId,
        document: NewDocument,
    ) -> StoreResult<Document> {
        let profile = self
            .driver_row_by_user(user_id)
            .await?
            .ok_or(StoreError::NotFound)?;

        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "INSERT INTO driver_documents (id, driver_profile_id, doc_type, file_url, status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(DocumentId::new())
        .bind(profile.id)
        .bind(document.doc_type.as_str())
        .bind(document.file_url)
        .bind(DocumentStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;

        Document::try_from(row)
    }

    #[instrument(skip(self))]
    async fn list_driver_documents(&self, user_id: UserId) -> StoreResult<Vec<Document>> {
        let profile = self
            .driver_row_by_user(user_id)
            .await?
            .ok_or(StoreError::NotFound)?;
        let mut documents = self.documents_for(&[profile.id]).await?;
        Ok(documents.remove(&profile.id).unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn list_drivers(&self, status: Option<DriverStatus>) -> StoreResult<Vec<DriverWithUser>> {
        let rows = sqlx::query_as::<_, DriverRow>(&format!(
            "SELECT {DRIVER_COLUMNS} FROM driver_profiles \
             WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY created_at, id"
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        let profile_ids: Vec<DriverProfileId> = rows.iter().map(|r| r.id).collect();
        let user_ids: Vec<UserId> = rows.iter().map(|r| r.user_id).collect();

        let mut documents = self.documents_for(&profile_ids).await?;
        let mut users: HashMap<UserId, User> = HashMap::new();
        for row in sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(&user_ids)
        .fetch_all(&self.pool)
        .await?
        {
            let user = User::try_from(row)?;
            users.insert(user.id, user);
        }

        let mut drivers = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(user) = users.get(&row.user_id) else {
                continue;
            };
            let docs = documents.remove(&row.id).unwrap_or_default();
            drivers.push(DriverWithUser {
                user: PublicUser::from(user),
                driver_profile: row.into_profile(docs)?,
            });
        }
        Ok(drivers)
    }

    #[instrument(skip(self))]
    async fn approve_driver(
        &self,
        id: DriverProfileId,
        approver: UserId,
    ) -> StoreResult<DriverProfile> {
        let mut tx = self.pool.begin().await?;
        let row = Self::stamp_review(&mut tx, id, DriverStatus::Approved, approver, None).await?;
        tx.commit().await?;
        self.hydrate(row).await
    }

    #[instrument(skip(self, reason))]
    async fn reject_driver(
        &self,
        id: DriverProfileId,
        approver: UserId,
        reason: String,
    ) -> StoreResult<DriverWithUser> {
        let mut tx = self.pool.begin().await?;

        let row =
            Self::stamp_review(&mut tx, id, DriverStatus::Rejected, approver, Some(reason)).await?;

        let user_row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(row.user_id)
        .bind(UserStatus::Rejected.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound)?;

        tx.commit().await?;

        let user = User::try_from(user_row)?;
        Ok(DriverWithUser {
            user: PublicUser::from(&user),
            driver_profile: self.hydrate(row).await?,
        })
    }
}
