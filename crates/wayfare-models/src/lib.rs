//! # Wayfare Models
//!
//! Domain models and DTOs for the Wayfare API.
//!
//! # Modules
//!
//! - [`auth`]: Signup, login and refresh DTOs
//! - [`enums`]: Role, status and document tag sets
//! - [`ids`]: Strongly-typed entity identifiers
//! - [`profiles`]: Driver/rider profiles and documents
//! - [`serde`]: Trimming deserialisers for free-text input
//! - [`users`]: Identities and their public projection
//! - [`value_types`]: Validated primitives such as [`Email`]

pub mod auth;
pub mod enums;
pub mod ids;
pub mod profiles;
pub mod serde;
pub mod users;
pub mod value_types;

// Re-export commonly used types at crate root for convenience
pub use auth::{
    AuthResponse, HealthResponse, LoginRequest, RefreshTokenRequest, SIGNUP_ROLES, SignupRequest,
    TokenPair,
};
pub use enums::{DocumentStatus, DocumentType, DriverStatus, UnknownVariant, UserRole, UserStatus};
pub use ids::{DocumentId, DriverProfileId, RiderProfileId, UserId};
pub use profiles::{
    Document, DriverFilterParams, DriverProfile, DriverWithUser, ProfileResponse,
    RejectDriverRequest, RiderProfile, SetAvailabilityRequest, UpdateDriverProfileRequest,
    UploadDocumentRequest, Vehicle, VehicleRequest,
};
pub use users::{
    PublicUser, UpdateProfileRequest, UpdateUserStatusRequest, User, UserFilterParams,
};
pub use value_types::{Email, ValueTypeError};
