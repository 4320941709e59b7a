//! License lifecycle status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use keyhub_core::AppError;

/// Lifecycle state of a license.
///
/// The legal transitions are `Issued → InUse`, `Issued → Stopped`, and
/// `InUse → Stopped`. A stopped license is terminal: there is no path back
/// to `Issued` or `InUse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "license_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LicenseStatus {
    /// Issued but never activated.
    Issued,
    /// Activated and bound to a hardware fingerprint.
    InUse,
    /// Revoked by an administrator; permanently dead.
    Stopped,
}

impl LicenseStatus {
    /// Validate a transition to `to`, returning the new status.
    ///
    /// This is the single place lifecycle rules are encoded; callers never
    /// compare status strings directly.
    pub fn transition(self, to: LicenseStatus) -> Result<LicenseStatus, AppError> {
        use LicenseStatus::*;
        match (self, to) {
            (Issued, InUse) | (Issued, Stopped) | (InUse, Stopped) => Ok(to),
            (from, to) => Err(AppError::license(format!(
                "Illegal license transition: {from} -> {to}"
            ))),
        }
    }

    /// Check if a first activation is possible from this status.
    pub fn can_activate(&self) -> bool {
        matches!(self, Self::Issued)
    }

    /// Check if this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Return the status as its stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issued => "ISSUED",
            Self::InUse => "IN_USE",
            Self::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LicenseStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ISSUED" => Ok(Self::Issued),
            "IN_USE" => Ok(Self::InUse),
            "STOPPED" => Ok(Self::Stopped),
            _ => Err(AppError::validation(format!(
                "Invalid license status: '{s}'. Expected one of: ISSUED, IN_USE, STOPPED"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_transitions() {
        assert!(LicenseStatus::Issued.transition(LicenseStatus::InUse).is_ok());
        assert!(LicenseStatus::Issued.transition(LicenseStatus::Stopped).is_ok());
        assert!(LicenseStatus::InUse.transition(LicenseStatus::Stopped).is_ok());
    }

    #[test]
    fn test_stopped_is_terminal() {
        assert!(LicenseStatus::Stopped.transition(LicenseStatus::InUse).is_err());
        assert!(LicenseStatus::Stopped.transition(LicenseStatus::Issued).is_err());
        assert!(LicenseStatus::Stopped.transition(LicenseStatus::Stopped).is_err());
        assert!(LicenseStatus::Stopped.is_terminal());
    }

    #[test]
    fn test_no_reactivation_from_in_use() {
        assert!(LicenseStatus::InUse.transition(LicenseStatus::InUse).is_err());
        assert!(LicenseStatus::InUse.transition(LicenseStatus::Issued).is_err());
    }

    #[test]
    fn test_only_issued_can_activate() {
        assert!(LicenseStatus::Issued.can_activate());
        assert!(!LicenseStatus::InUse.can_activate());
        assert!(!LicenseStatus::Stopped.can_activate());
    }

    #[test]
    fn test_round_trip_str() {
        for status in [
            LicenseStatus::Issued,
            LicenseStatus::InUse,
            LicenseStatus::Stopped,
        ] {
            assert_eq!(status.as_str().parse::<LicenseStatus>().unwrap(), status);
        }
    }
}
