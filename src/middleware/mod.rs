//! Request authentication and authorization.
//!
//! - [`auth`]: the [`AuthUser`](auth::AuthUser) bearer-token extractor
//! - [`role`]: role guards and the live account-status guard
//!
//! A protected request flows through: bearer token verified (401 on failure),
//! role compared against the route's requirement (403), stored identity
//! re-read and required to be `active` (403), then the handler.

pub mod auth;
pub mod role;
