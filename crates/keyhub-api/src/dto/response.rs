//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use keyhub_entity::admin::{Admin, AdminRole};
use keyhub_entity::license::VerificationOutcome;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Body returned by the verification endpoint on 200 responses
/// (first activation and replay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyAcceptedResponse {
    /// `true` only for a fresh activation.
    pub success: bool,
    /// `"Y"` or `"D"`.
    pub check: String,
    /// Outcome description.
    pub message: String,
}

/// Body returned by the verification endpoint on 401/500 responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRejectedResponse {
    /// Always `false`.
    pub success: bool,
    /// Always `"N"`.
    pub check: String,
    /// Rejection description.
    pub error: String,
}

impl VerifyAcceptedResponse {
    /// Build the 200 body for a `Success` or `Duplicate` outcome.
    pub fn from_outcome(outcome: VerificationOutcome) -> Self {
        Self {
            success: outcome.is_success(),
            check: outcome.check_code().to_string(),
            message: outcome.message().to_string(),
        }
    }
}

impl VerifyRejectedResponse {
    /// Build the 401 body for an `Invalid` outcome.
    pub fn invalid() -> Self {
        Self {
            success: false,
            check: VerificationOutcome::Invalid.check_code().to_string(),
            error: VerificationOutcome::Invalid.message().to_string(),
        }
    }

    /// Build the 500 body for a storage failure.
    pub fn internal() -> Self {
        Self {
            success: false,
            check: VerificationOutcome::Invalid.check_code().to_string(),
            error: "Internal server error".to_string(),
        }
    }
}

/// Admin summary for responses; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminResponse {
    /// Account ID.
    pub id: Uuid,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: AdminRole,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<Admin> for AdminResponse {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email,
            name: admin.name,
            role: admin.role,
            created_at: admin.created_at,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
    /// The logged-in admin.
    pub admin: AdminResponse,
}

/// Bulk delete result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteResponse {
    /// Number of rows removed.
    pub deleted_count: u64,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_body_for_success() {
        let body = VerifyAcceptedResponse::from_outcome(VerificationOutcome::Success);
        assert!(body.success);
        assert_eq!(body.check, "Y");
    }

    #[test]
    fn test_accepted_body_for_duplicate_is_not_success() {
        let body = VerifyAcceptedResponse::from_outcome(VerificationOutcome::Duplicate);
        assert!(!body.success);
        assert_eq!(body.check, "D");
    }

    #[test]
    fn test_rejected_bodies_use_check_n() {
        assert_eq!(VerifyRejectedResponse::invalid().check, "N");
        assert_eq!(VerifyRejectedResponse::internal().check, "N");
    }
}
