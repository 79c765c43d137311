//! Token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with [`JwtConfig::secret`]. Access tokens
//! live for `access_token_expiry` seconds, refresh tokens for
//! `refresh_token_expiry`. Verification never errors: any failure (expired,
//! malformed, bad signature, wrong token kind) yields `None`, and the caller
//! treats that as unauthenticated.
//!
//! # Example
//!
//! ```ignore
//! use wayfare_auth::{TokenSubject, issue_token_pair, verify_refresh_token};
//!
//! let tokens = issue_token_pair(&TokenSubject::from(&user), &jwt_config)?;
//! let claims = verify_refresh_token(&tokens.refresh_token, &jwt_config);
//! ```

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use wayfare_config::JwtConfig;
use wayfare_core::AppError;
use wayfare_models::TokenPair;

use crate::claims::{Claims, RefreshTokenClaims, TokenSubject, TokenType};

/// Returns `(iat, exp)` for a token living `lifetime` seconds from now.
fn timestamps(lifetime: i64) -> (usize, usize) {
    let iat = Utc::now().timestamp();
    (iat as usize, (iat + lifetime).max(0) as usize)
}

fn sign<T: serde::Serialize>(claims: &T, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

fn decode_claims<T: DeserializeOwned>(token: &str, jwt_config: &JwtConfig) -> Option<T> {
    decode::<T>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| tracing::debug!(error = %e, "Token rejected"))
    .ok()
}

/// Creates a short-lived access token for `subject`.
pub fn create_access_token(
    subject: &TokenSubject,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let (iat, exp) = timestamps(jwt_config.access_token_expiry);
    let claims = Claims {
        sub: subject.id,
        email: subject.email.clone(),
        role: subject.role,
        status: subject.status,
        token_type: TokenType::Access,
        exp,
        iat,
    };

    sign(&claims, jwt_config)
}

/// Creates a long-lived refresh token for `subject`.
pub fn create_refresh_token(
    subject: &TokenSubject,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let (iat, exp) = timestamps(jwt_config.refresh_token_expiry);
    let claims = RefreshTokenClaims {
        sub: subject.id,
        email: subject.email.clone(),
        role: subject.role,
        status: subject.status,
        token_type: TokenType::Refresh,
        exp,
        iat,
        jti: Uuid::new_v4().to_string(),
    };

    sign(&claims, jwt_config)
}

/// Issues an access token and a refresh token for the same subject.
pub fn issue_token_pair(
    subject: &TokenSubject,
    jwt_config: &JwtConfig,
) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        access_token: create_access_token(subject, jwt_config)?,
        refresh_token: create_refresh_token(subject, jwt_config)?,
    })
}

/// Verifies an access token, returning its claims.
pub fn verify_access_token(token: &str, jwt_config: &JwtConfig) -> Option<Claims> {
    decode_claims::<Claims>(token, jwt_config).filter(|c| c.token_type == TokenType::Access)
}

/// Verifies a refresh token, returning its claims.
pub fn verify_refresh_token(token: &str, jwt_config: &JwtConfig) -> Option<RefreshTokenClaims> {
    decode_claims::<RefreshTokenClaims>(token, jwt_config)
        .filter(|c| c.token_type == TokenType::Refresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfare_models::{UserId, UserRole, UserStatus};

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
        }
    }

    fn subject(role: UserRole) -> TokenSubject {
        TokenSubject {
            id: UserId::new(),
            email: "test@example.com".to_string(),
            role,
            status: UserStatus::Active,
        }
    }

    #[test]
    fn test_access_token_roundtrip() {
        let config = get_test_jwt_config();
        let subject = subject(UserRole::Driver);

        let token = create_access_token(&subject, &config).unwrap();
        let claims = verify_access_token(&token, &config).unwrap();

        assert_eq!(claims.sub, subject.id);
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.role, UserRole::Driver);
        assert_eq!(claims.status, UserStatus::Active);
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_refresh_token_roundtrip() {
        let config = get_test_jwt_config();
        let subject = subject(UserRole::Rider);

        let token = create_refresh_token(&subject, &config).unwrap();
        let claims = verify_refresh_token(&token, &config).unwrap();

        assert_eq!(claims.sub, subject.id);
        assert_eq!(claims.role, UserRole::Rider);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_verify_garbage_is_none() {
        let config = get_test_jwt_config();
        assert!(verify_access_token("invalid-token", &config).is_none());
        assert!(verify_refresh_token("invalid-token", &config).is_none());
        assert!(verify_refresh_token("", &config).is_none());
    }

    #[test]
    fn test_verify_wrong_secret_is_none() {
        let config = get_test_jwt_config();
        let tokens = issue_token_pair(&subject(UserRole::Admin), &config).unwrap();

        let wrong_config = JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            ..config
        };

        assert!(verify_access_token(&tokens.access_token, &wrong_config).is_none());
        assert!(verify_refresh_token(&tokens.refresh_token, &wrong_config).is_none());
    }

    #[test]
    fn test_expired_token_is_none() {
        let config = JwtConfig {
            access_token_expiry: -3600,
            refresh_token_expiry: -3600,
            ..get_test_jwt_config()
        };
        let tokens = issue_token_pair(&subject(UserRole::Rider), &config).unwrap();

        assert!(verify_access_token(&tokens.access_token, &config).is_none());
        assert!(verify_refresh_token(&tokens.refresh_token, &config).is_none());
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let config = get_test_jwt_config();
        let tokens = issue_token_pair(&subject(UserRole::Rider), &config).unwrap();

        assert!(verify_access_token(&tokens.refresh_token, &config).is_none());
        assert!(verify_refresh_token(&tokens.access_token, &config).is_none());
    }

    #[test]
    fn test_refresh_token_expiry_longer_than_access() {
        let config = get_test_jwt_config();
        let tokens = issue_token_pair(&subject(UserRole::Driver), &config).unwrap();

        let access = verify_access_token(&tokens.access_token, &config).unwrap();
        let refresh = verify_refresh_token(&tokens.refresh_token, &config).unwrap();

        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let config = get_test_jwt_config();
        let subject = subject(UserRole::Rider);

        let first = create_refresh_token(&subject, &config).unwrap();
        let second = create_refresh_token(&subject, &config).unwrap();

        assert_ne!(first, second);
    }
}
