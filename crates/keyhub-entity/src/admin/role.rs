//! Admin role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use keyhub_core::AppError;

/// Role of an administrator account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "admin_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminRole {
    /// Full access, including admin account management.
    SuperAdmin,
    /// Regular administrator.
    Admin,
}

impl AdminRole {
    /// Check if this role may manage other admin accounts.
    pub fn can_manage_admins(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// Return the role as its stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AdminRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(AppError::validation(format!(
                "Invalid admin role: '{s}'. Expected one of: SUPER_ADMIN, ADMIN"
            ))),
        }
    }
}
