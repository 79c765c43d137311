//! # Wayfare Auth
//!
//! Token claims and JWT utilities for the Wayfare API.
//!
//! - [`claims`]: access and refresh token claim structures
//! - [`jwt`]: issuing and verifying tokens
//!
//! Tokens are self-contained: any token pair can be verified with the shared
//! secret alone, without a server-side session table.

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{Claims, RefreshTokenClaims, TokenSubject, TokenType};
pub use jwt::{
    create_access_token, create_refresh_token, issue_token_pair, verify_access_token,
    verify_refresh_token,
};
