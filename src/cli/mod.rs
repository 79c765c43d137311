//! Administrative commands used by the `wayfare-cli` binary.
//!
//! Admin accounts cannot be created through the public signup endpoint;
//! this is the only way to provision one.

use anyhow::{Context, bail};
use wayfare_core::hash_password_with_cost;
use wayfare_models::{Email, User, UserRole, UserStatus};
use wayfare_observability::track_user_created;

use crate::store::{NewUser, UserStore};

#[derive(Debug, Clone)]
pub struct CreateAdmin {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
}

/// Creates an active admin identity.
pub async fn create_admin(
    store: &dyn UserStore,
    input: CreateAdmin,
    bcrypt_cost: u32,
) -> anyhow::Result<User> {
    let email = Email::new(&input.email).context("Invalid email address")?;
    let first_name = input.first_name.trim();
    let last_name = input.last_name.trim();
    let phone_number = input.phone_number.trim();

    if first_name.is_empty() || last_name.is_empty() {
        bail!("First and last name are required");
    }
    if input.password.chars().count() < 8 {
        bail!("Password must be at least 8 characters");
    }
    if phone_number.chars().count() < 10 {
        bail!("Phone number must be at least 10 characters");
    }

    if store.find_user_by_email(&email).await?.is_some() {
        bail!("A user with email {email} already exists");
    }

    let password_hash = hash_password_with_cost(&input.password, bcrypt_cost)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e.error))?;

    let user = store
        .create_user(NewUser {
            email,
            password_hash,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone_number: phone_number.to_string(),
            role: UserRole::Admin,
            status: UserStatus::Active,
        })
        .await?;

    track_user_created(user.role.as_str());
    Ok(user)
}
