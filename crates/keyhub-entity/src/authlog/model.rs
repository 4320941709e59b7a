//! Authentication log entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Data required to append a new auth log row.
///
/// Rows are append-only: written exclusively by the activation engine,
/// never updated or deleted by normal operation. `license_id` is a
/// back-reference only; it becomes null when the license is deleted or
/// when the attempt matched no license at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuthLog {
    /// The license this attempt resolved to, if any.
    pub license_id: Option<i64>,
    /// Whether the attempt succeeded.
    pub status: bool,
    /// Source address of the caller.
    pub client_ip: String,
    /// Short human-readable outcome.
    pub message: String,
}

/// An auth log row joined with its license's program and client context
/// for the admin log viewer. Context fields are null for orphaned rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuthLogWithContext {
    /// Unique log entry identifier.
    pub id: i64,
    /// The license this attempt resolved to, if any.
    pub license_id: Option<i64>,
    /// Whether the attempt succeeded.
    pub status: bool,
    /// Source address of the caller.
    pub client_ip: String,
    /// Short human-readable outcome.
    pub message: String,
    /// When the attempt occurred.
    pub created_at: DateTime<Utc>,
    /// Program name of the referenced license.
    pub program_name: Option<String>,
    /// Client id of the referenced license.
    pub client_id: Option<String>,
}
