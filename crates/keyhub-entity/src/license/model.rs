//! License entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use keyhub_core::AppError;

use super::status::LicenseStatus;

/// A license granting one client permission to run one program until
/// expiry, bound to one piece of hardware after first use.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct License {
    /// Unique license identifier.
    pub id: i64,
    /// Opaque unique token presented by client software (UUID by default).
    pub license_key: String,
    /// Product identifier this license is issued for.
    pub program_name: String,
    /// Customer/tenant identifier; must match on verification.
    pub client_id: String,
    /// Hardware fingerprint bound at first successful activation.
    /// Permanent for the life of the license.
    pub hardware_id: Option<String>,
    /// Free-text label an admin can attach to a running client.
    pub user_name: Option<String>,
    /// Admin kill-switch, independent of `status`.
    pub is_active: bool,
    /// Lifecycle state.
    pub status: LicenseStatus,
    /// Set exactly once, at first successful activation.
    pub activated_at: Option<DateTime<Utc>>,
    /// Advisory timestamp maintained by the liveness registry.
    pub last_checked_at: Option<DateTime<Utc>>,
    /// Hard expiry; a license past this instant is never valid.
    pub expires_at: DateTime<Utc>,
    /// When the license was issued.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl License {
    /// Check whether this license is eligible for a first activation at
    /// `now`: the kill-switch is on, the license was never activated, and
    /// it has not expired.
    pub fn is_eligible_for_activation(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.status.can_activate() && self.expires_at > now
    }
}

/// Data required to create a new license row.
///
/// New licenses always start as `ISSUED` with the kill-switch on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLicense {
    /// Product identifier.
    pub program_name: String,
    /// Customer/tenant identifier.
    pub client_id: String,
    /// Opaque unique token.
    pub license_key: String,
    /// Hard expiry.
    pub expires_at: DateTime<Utc>,
    /// Issuance time override, used when restoring exported rows.
    /// `None` means "now".
    pub created_at: Option<DateTime<Utc>>,
}

/// Which date column a range filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseDateField {
    /// Issuance time.
    CreatedAt,
    /// First activation time.
    ActivatedAt,
    /// Hard expiry.
    ExpiresAt,
}

impl LicenseDateField {
    /// The column name this field maps to. Fixed set, so range filters can
    /// never inject arbitrary SQL.
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::ActivatedAt => "activated_at",
            Self::ExpiresAt => "expires_at",
        }
    }
}

impl std::str::FromStr for LicenseDateField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(Self::CreatedAt),
            "activated_at" => Ok(Self::ActivatedAt),
            "expires_at" => Ok(Self::ExpiresAt),
            _ => Err(AppError::validation(format!(
                "Invalid date field: '{s}'. Expected one of: created_at, activated_at, expires_at"
            ))),
        }
    }
}

/// Search criteria for the admin license listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseSearch {
    /// Free-text substring match over program name, client id, and
    /// license key.
    pub search: Option<String>,
    /// Exact lifecycle status filter.
    pub status: Option<LicenseStatus>,
    /// Date column a range filter applies to.
    pub date_field: Option<LicenseDateField>,
    /// Inclusive range start.
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive range end.
    pub date_to: Option<DateTime<Utc>>,
}

/// Criteria for bulk deletion. Both fields unset deletes everything the
/// caller asked for, so handlers validate at least one is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkDeleteFilter {
    /// Restrict to one program.
    pub program_name: Option<String>,
    /// Restrict to one lifecycle status.
    pub status: Option<LicenseStatus>,
}

/// Per-month issuance counts for the dashboard chart.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MonthlyLicenseCount {
    /// Month in `YYYY-MM` form.
    pub month: String,
    /// Licenses created in that month.
    pub total: i64,
    /// Of those, currently `IN_USE`.
    pub in_use: i64,
}

/// An in-use license annotated with process liveness for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunningClient {
    /// The license record.
    #[serde(flatten)]
    pub license: License,
    /// Whether the liveness registry reports a running client process.
    /// `false` when the registry is unreachable.
    pub running: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn license(status: LicenseStatus, is_active: bool, expires_in: Duration) -> License {
        let now = Utc::now();
        License {
            id: 1,
            license_key: "k".to_string(),
            program_name: "prog".to_string(),
            client_id: "c".to_string(),
            hardware_id: None,
            user_name: None,
            is_active,
            status,
            activated_at: None,
            last_checked_at: None,
            expires_at: now + expires_in,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_issued_active_unexpired_is_eligible() {
        let l = license(LicenseStatus::Issued, true, Duration::days(1));
        assert!(l.is_eligible_for_activation(Utc::now()));
    }

    #[test]
    fn test_expired_license_is_never_eligible() {
        let l = license(LicenseStatus::Issued, true, Duration::days(-1));
        assert!(!l.is_eligible_for_activation(Utc::now()));
    }

    #[test]
    fn test_kill_switch_gates_eligibility() {
        let l = license(LicenseStatus::Issued, false, Duration::days(1));
        assert!(!l.is_eligible_for_activation(Utc::now()));
    }

    #[test]
    fn test_stopped_is_not_eligible_even_when_active() {
        let l = license(LicenseStatus::Stopped, true, Duration::days(1));
        assert!(!l.is_eligible_for_activation(Utc::now()));
    }

    #[test]
    fn test_date_field_columns_are_fixed() {
        assert_eq!(LicenseDateField::CreatedAt.column(), "created_at");
        assert_eq!(LicenseDateField::ActivatedAt.column(), "activated_at");
        assert_eq!(LicenseDateField::ExpiresAt.column(), "expires_at");
        assert!("updated_at; DROP TABLE licenses".parse::<LicenseDateField>().is_err());
    }
}
