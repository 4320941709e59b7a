//! Liveness source capability trait.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::result::AppResult;

/// External registry reporting which activated licenses currently have a
/// running client process.
///
/// Implementations are best-effort: callers wrap the lookup in a bounded
/// timeout and treat any failure as "no liveness data" rather than
/// propagating it.
#[async_trait]
pub trait LivenessSource: Send + Sync + 'static {
    /// Return the set of license keys with a live client process.
    async fn active_license_keys(&self) -> AppResult<HashSet<String>>;
}
