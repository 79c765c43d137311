//! JWT claim structures.
//!
//! - [`Claims`]: access token claims
//! - [`RefreshTokenClaims`]: refresh token claims
//!
//! Both carry the same identity attributes. A `token_type` discriminator keeps
//! one kind from being accepted where the other is expected.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use wayfare_models::{User, UserId, UserRole, UserStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// The identity attributes embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
}

impl From<&User> for TokenSubject {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            role: user.role,
            status: user.status,
        }
    }
}

/// Access token claims.
///
/// These are trusted for the lifetime of a single request only; status-sensitive
/// checks re-read the stored identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: UserId,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub token_type: TokenType,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

/// Refresh token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub sub: UserId,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub token_type: TokenType,
    pub exp: usize,
    pub iat: usize,
    /// Unique token identifier, so two refresh tokens issued in the same second differ
    pub jti: String,
}
