//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use keyhub_entity::admin::AdminRole;
use keyhub_entity::license::LicenseStatus;

/// Verification request from client software.
///
/// camelCase on the wire: the field names are fixed by deployed clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// The license key presented by the client.
    pub license_key: String,
    /// The client id the key was issued to.
    pub client_id: String,
    /// The calling machine's hardware fingerprint.
    pub hardware_id: String,
}

/// Admin login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh_token: String,
}

/// Create a single license with an explicit key.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLicenseRequest {
    /// Product identifier.
    #[validate(length(min = 1, max = 255))]
    pub program_name: String,
    /// Customer/tenant identifier.
    #[validate(length(min = 1, max = 255))]
    pub client_id: String,
    /// License key.
    #[validate(length(min = 1, max = 255))]
    pub license_key: String,
    /// Hard expiry.
    pub expires_at: DateTime<Utc>,
}

/// Generate a numbered batch of licenses.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkGenerateRequest {
    /// Product identifier.
    #[validate(length(min = 1, max = 255))]
    pub program_name: String,
    /// Client id prefix.
    #[validate(length(min = 1, max = 200))]
    pub client_id_prefix: String,
    /// Batch size.
    #[validate(range(min = 1, max = 10_000))]
    pub count: u32,
    /// Hard expiry applied to the whole batch.
    pub expires_at: DateTime<Utc>,
}

/// Bulk delete criteria. At least one field must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkDeleteRequest {
    /// Restrict to one program.
    pub program_name: Option<String>,
    /// Restrict to one lifecycle status.
    pub status: Option<LicenseStatus>,
}

/// Toggle the `is_active` kill-switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleActiveRequest {
    /// New kill-switch value.
    pub is_active: bool,
}

/// Set or clear the display-only user name label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserNameRequest {
    /// New label; `None` clears it.
    pub user_name: Option<String>,
}

/// Query parameters for the license listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LicenseListQuery {
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub per_page: Option<u64>,
    /// Free-text substring search.
    pub search: Option<String>,
    /// Lifecycle status filter.
    pub status: Option<LicenseStatus>,
    /// Date column a range filter applies to.
    pub date_field: Option<String>,
    /// Inclusive range start.
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive range end.
    pub date_to: Option<DateTime<Utc>>,
}

/// Query parameters for the auth log listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogListQuery {
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub per_page: Option<u64>,
    /// Outcome filter: `all`, `success`, or `fail`.
    pub filter: Option<String>,
}

/// Create an admin account.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAdminRequest {
    /// Login email.
    #[validate(email)]
    pub email: String,
    /// Display name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Role.
    pub role: AdminRole,
}

/// Update an admin account. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAdminRequest {
    /// New display name.
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    /// New role.
    pub role: Option<AdminRole>,
    /// New password.
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_request_is_camel_case_on_the_wire() {
        let body = r#"{"licenseKey":"K1","clientId":"C1","hardwareId":"HW1"}"#;
        let req: VerifyRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.license_key, "K1");
        assert_eq!(req.client_id, "C1");
        assert_eq!(req.hardware_id, "HW1");
    }

    #[test]
    fn test_status_filter_uses_stored_names() {
        let query: LicenseListQuery =
            serde_json::from_str(r#"{"status":"IN_USE"}"#).unwrap();
        assert_eq!(query.status, Some(LicenseStatus::InUse));
    }
}
