//! Role profiles: driver and rider extensions of an identity.
//!
//! A driver profile carries licence and vehicle attributes, an availability
//! flag, the approval workflow fields and the ordered list of uploaded
//! [`Document`]s. Profiles are created at signup and never deleted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::enums::{DocumentStatus, DocumentType, DriverStatus};
use crate::ids::{DocumentId, DriverProfileId, RiderProfileId, UserId};
use crate::serde::deserialize_trimmed;
use crate::users::PublicUser;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub plate_number: Option<String>,
}

/// Evidence artifact attached to a driver profile. Appended, never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub file_url: Option<String>,
    pub status: DocumentStatus,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfile {
    pub id: DriverProfileId,
    pub user_id: UserId,
    pub license_number: Option<String>,
    pub license_expiry: Option<NaiveDate>,
    pub vehicle: Vehicle,
    pub is_available: bool,
    pub status: DriverStatus,
    pub approved_by: Option<UserId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub documents: Vec<Document>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DriverProfile {
    /// A fresh profile as created at signup: awaiting approval, unavailable.
    pub fn new_pending(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: DriverProfileId::new(),
            user_id,
            license_number: None,
            license_expiry: None,
            vehicle: Vehicle::default(),
            is_available: false,
            status: DriverStatus::PendingApproval,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            documents: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == DriverStatus::Approved
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RiderProfile {
    pub id: RiderProfileId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RiderProfile {
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: RiderProfileId::new(),
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Response for `GET /api/profile`: the caller and whichever role profile
/// their role carries.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: PublicUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_profile: Option<DriverProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rider_profile: Option<RiderProfile>,
}

/// A driver profile together with its owning account, for admin views.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverWithUser {
    pub user: PublicUser,
    pub driver_profile: DriverProfile,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRequest {
    #[validate(length(min = 1, max = 50, message = "Vehicle make must be 1-50 characters"))]
    pub make: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Vehicle model must be 1-50 characters"))]
    pub model: Option<String>,
    #[validate(range(min = 1980, max = 2100, message = "Vehicle year must be between 1980 and 2100"))]
    pub year: Option<i32>,
    #[validate(length(min = 1, max = 30, message = "Vehicle color must be 1-30 characters"))]
    pub color: Option<String>,
    #[validate(length(min = 1, max = 16, message = "Plate number must be 1-16 characters"))]
    pub plate_number: Option<String>,
}

/// Driver self-service update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDriverProfileRequest {
    #[validate(length(min = 1, max = 64, message = "License number must be 1-64 characters"))]
    pub license_number: Option<String>,
    pub license_expiry: Option<NaiveDate>,
    #[validate(nested)]
    pub vehicle: Option<VehicleRequest>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetAvailabilityRequest {
    pub is_available: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentRequest {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[validate(url(message = "File URL must be a valid URL"))]
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RejectDriverRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: String,
}

/// Query parameters for the admin driver listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DriverFilterParams {
    pub status: Option<DriverStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_driver_profile_is_pending_and_unavailable() {
        let profile = DriverProfile::new_pending(UserId::new(), Utc::now());
        assert_eq!(profile.status, DriverStatus::PendingApproval);
        assert!(!profile.is_available);
        assert!(profile.documents.is_empty());
        assert!(!profile.is_approved());
    }

    #[test]
    fn test_driver_profile_json_shape() {
        let profile = DriverProfile::new_pending(UserId::new(), Utc::now());
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["status"], "pending_approval");
        assert_eq!(json["isAvailable"], false);
        assert!(json["vehicle"].is_object());
    }

    #[test]
    fn test_nested_vehicle_validation() {
        let dto = UpdateDriverProfileRequest {
            vehicle: Some(VehicleRequest {
                year: Some(1900),
                ..Default::default()
            }),
            ..Default::default()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.errors().contains_key("vehicle"));
    }

    #[test]
    fn test_document_request_uses_type_key() {
        let dto: UploadDocumentRequest =
            serde_json::from_str(r#"{"type":"insurance","fileUrl":"https://files.example.com/a.pdf"}"#)
                .unwrap();
        assert_eq!(dto.doc_type, DocumentType::Insurance);
        assert!(dto.validate().is_ok());

        let bad_url = UploadDocumentRequest {
            doc_type: DocumentType::License,
            file_url: Some("not a url".to_string()),
        };
        assert!(bad_url.validate().is_err());
    }

    #[test]
    fn test_reject_reason_required() {
        let dto = RejectDriverRequest {
            reason: String::new(),
        };
        assert!(dto.validate().is_err());
    }
}
