//! Verification outcome type.

use serde::{Deserialize, Serialize};

/// Outcome of a license verification attempt.
///
/// Deliberately a three-variant type rather than a boolean: client software
/// distinguishes "fresh activation" from "already active, carry on" to
/// decide whether to persist local state, while rejections reveal nothing
/// about why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// First activation: the license was just bound to this hardware.
    Success,
    /// Replay: the license is already `IN_USE`. The expected steady-state
    /// response for a client re-checking its activated license.
    Duplicate,
    /// No eligible license matched. Covers not-found, expired,
    /// kill-switched, and stopped; the caller cannot tell these apart.
    Invalid,
}

impl VerificationOutcome {
    /// Single-character code used on the wire (`"Y"` / `"D"` / `"N"`).
    pub fn check_code(&self) -> &'static str {
        match self {
            Self::Success => "Y",
            Self::Duplicate => "D",
            Self::Invalid => "N",
        }
    }

    /// Whether this outcome represents a fresh activation.
    ///
    /// `Duplicate` is not a success on the wire even though it is the
    /// normal replay response.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Human-readable outcome message recorded in the audit trail and
    /// returned to the client.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "first activation",
            Self::Duplicate => "already activated",
            Self::Invalid => "invalid license",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_codes() {
        assert_eq!(VerificationOutcome::Success.check_code(), "Y");
        assert_eq!(VerificationOutcome::Duplicate.check_code(), "D");
        assert_eq!(VerificationOutcome::Invalid.check_code(), "N");
    }

    #[test]
    fn test_only_first_activation_is_success() {
        assert!(VerificationOutcome::Success.is_success());
        assert!(!VerificationOutcome::Duplicate.is_success());
        assert!(!VerificationOutcome::Invalid.is_success());
    }
}
