//! Persistence seam for the activation engine.

use async_trait::async_trait;

use keyhub_core::AppResult;

use crate::authlog::NewAuthLog;

use super::model::License;

/// The single persistence interface the activation engine depends on.
///
/// The engine is the sole writer of `status`, `hardware_id`,
/// `activated_at`, and the auth log; everything it needs from storage is
/// expressed here. The production implementation lives in
/// `keyhub-database` on top of PostgreSQL, which is also the sole
/// serialization point for concurrent verifications — implementations must
/// make [`claim_activation`](Self::claim_activation) atomic per license.
#[async_trait]
pub trait ActivationStore: Send + Sync + 'static {
    /// Look up a license by its key and client id. Both must match; no
    /// eligibility filtering is applied here.
    async fn find_by_key_and_client(
        &self,
        license_key: &str,
        client_id: &str,
    ) -> AppResult<Option<License>>;

    /// Look up a license by id.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<License>>;

    /// Attempt the one-time `ISSUED → IN_USE` claim, binding `hardware_id`
    /// and stamping `activated_at`.
    ///
    /// Must be a compare-and-swap on `status`: under N concurrent calls for
    /// the same license exactly one returns `Some(updated)`; the rest
    /// return `None`. The claim also re-checks the kill-switch and expiry
    /// so an admin action racing the activation can never be overwritten.
    async fn claim_activation(&self, id: i64, hardware_id: &str) -> AppResult<Option<License>>;

    /// Move a license to `STOPPED`, returning the updated row.
    async fn mark_stopped(&self, id: i64) -> AppResult<License>;

    /// Toggle the `is_active` kill-switch, returning the updated row.
    async fn set_active_flag(&self, id: i64, active: bool) -> AppResult<License>;

    /// All licenses with `status = IN_USE` and the kill-switch on, ordered
    /// by client id descending.
    async fn find_in_use(&self) -> AppResult<Vec<License>>;

    /// Append one row to the auth log. Never updates or deletes.
    async fn record_attempt(&self, attempt: NewAuthLog) -> AppResult<()>;
}
