//! Closed tag sets shared by identities, driver profiles and documents.
//!
//! Every tag serialises as its snake_case name, which is also the value
//! stored in the database `TEXT` columns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Error returned when a stored or supplied tag is outside its closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

text_enum!(
    /// Role tag carried by every identity and every token.
    UserRole("role") {
        Rider => "rider",
        Driver => "driver",
        Admin => "admin",
    }
);

text_enum!(
    /// Account status. Transitions are one-way in practice.
    UserStatus("user status") {
        Pending => "pending",
        Active => "active",
        Inactive => "inactive",
        Rejected => "rejected",
    }
);

text_enum!(
    /// Approval workflow state of a driver profile.
    DriverStatus("driver status") {
        PendingApproval => "pending_approval",
        Approved => "approved",
        Rejected => "rejected",
        Inactive => "inactive",
    }
);

text_enum!(
    DocumentType("document type") {
        License => "license",
        Insurance => "insurance",
        Registration => "registration",
        Inspection => "inspection",
    }
);

text_enum!(
    DocumentStatus("document status") {
        Pending => "pending",
        Verified => "verified",
        Rejected => "rejected",
    }
);

impl UserStatus {
    /// Accounts in these states may not sign in.
    pub fn is_locked(&self) -> bool {
        matches!(self, UserStatus::Rejected | UserStatus::Inactive)
    }
}
