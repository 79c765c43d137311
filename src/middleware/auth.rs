use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use wayfare_auth::{Claims, verify_access_token};
use wayfare_core::AppError;
use wayfare_models::{UserId, UserRole};

use crate::state::AppState;

/// Extractor that verifies the bearer access token and yields its claims.
///
/// Claims are trusted for this request only. Status-sensitive checks go
/// through [`require_active`](crate::middleware::role::require_active).
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> UserId {
        self.0.sub
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let token = bearer_token(parts)?;
        let claims = verify_access_token(token, &state.jwt_config)
            .ok_or_else(|| AppError::unauthorized("Invalid or expired token"))?;

        let user = AuthUser(claims);
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
