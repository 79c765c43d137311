use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use wayfare_core::{ErrorResponse, FieldError};
use wayfare_models::{
    AuthResponse, Document, DocumentStatus, DocumentType, DriverProfile, DriverStatus,
    DriverWithUser, HealthResponse, LoginRequest, ProfileResponse, PublicUser,
    RefreshTokenRequest, RejectDriverRequest, RiderProfile, SetAvailabilityRequest,
    SignupRequest, TokenPair, UpdateDriverProfileRequest, UpdateProfileRequest,
    UpdateUserStatusRequest, UploadDocumentRequest, UserRole, UserStatus, Vehicle,
    VehicleRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::health,
        crate::modules::auth::controller::signup,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::refresh,
        crate::modules::auth::controller::me,
        crate::modules::profile::controller::get_profile,
        crate::modules::profile::controller::update_profile,
        crate::modules::profile::controller::get_driver_profile,
        crate::modules::profile::controller::update_driver_profile,
        crate::modules::profile::controller::upload_document,
        crate::modules::profile::controller::list_documents,
        crate::modules::profile::controller::set_availability,
        crate::modules::admin::controller::list_pending_drivers,
        crate::modules::admin::controller::list_drivers,
        crate::modules::admin::controller::approve_driver,
        crate::modules::admin::controller::reject_driver,
        crate::modules::admin::controller::list_users,
        crate::modules::admin::controller::update_user_status,
    ),
    components(
        schemas(
            ErrorResponse,
            FieldError,
            HealthResponse,
            SignupRequest,
            LoginRequest,
            RefreshTokenRequest,
            AuthResponse,
            TokenPair,
            PublicUser,
            UserRole,
            UserStatus,
            ProfileResponse,
            UpdateProfileRequest,
            DriverProfile,
            DriverStatus,
            RiderProfile,
            Vehicle,
            VehicleRequest,
            UpdateDriverProfileRequest,
            SetAvailabilityRequest,
            Document,
            DocumentType,
            DocumentStatus,
            UploadDocumentRequest,
            DriverWithUser,
            RejectDriverRequest,
            UpdateUserStatusRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Authentication", description = "Signup, login and token refresh"),
        (name = "Profile", description = "Self-service rider and driver profiles"),
        (name = "Admin", description = "Driver approval and user administration")
    ),
    info(
        title = "Wayfare API",
        version = "0.1.0",
        description = "Rider and driver accounts, JWT authentication and driver approval for the Wayfare rideshare platform.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
