//! Admin account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::AdminRole;

/// An administrator account for the management surface.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    /// Unique account identifier.
    pub id: Uuid,
    /// Login email, unique.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Argon2id password hash. Never serialized into responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role.
    pub role: AdminRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new admin account.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Role.
    pub role: AdminRole,
}
