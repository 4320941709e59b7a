//! License activation engine.
//!
//! Sole owner of the license lifecycle: every write to `status`,
//! `hardware_id`, `activated_at`, and the auth log goes through this type.
//! The admin surface reaches the state machine only via [`stop`] and
//! [`set_active`].
//!
//! [`stop`]: ActivationEngine::stop
//! [`set_active`]: ActivationEngine::set_active

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use keyhub_core::AppResult;
use keyhub_core::error::AppError;
use keyhub_core::traits::LivenessSource;
use keyhub_entity::authlog::NewAuthLog;
use keyhub_entity::license::{
    ActivationStore, License, LicenseStatus, RunningClient, VerificationOutcome,
};

/// The activation engine.
///
/// Stateless apart from its injected store and liveness source; the
/// persistent store is the single source of truth and the sole
/// serialization point for concurrent verifications.
#[derive(Clone)]
pub struct ActivationEngine {
    /// Persistence seam; also performs the atomic activation claim.
    store: Arc<dyn ActivationStore>,
    /// External registry of running client processes.
    liveness: Arc<dyn LivenessSource>,
    /// Upper bound on the liveness lookup.
    liveness_timeout: Duration,
}

impl ActivationEngine {
    /// Creates a new activation engine.
    pub fn new(
        store: Arc<dyn ActivationStore>,
        liveness: Arc<dyn LivenessSource>,
        liveness_timeout: Duration,
    ) -> Self {
        Self {
            store,
            liveness,
            liveness_timeout,
        }
    }

    /// Verify a license for the calling client, activating it on first use.
    ///
    /// Returns one of three outcomes:
    /// - [`Success`](VerificationOutcome::Success) — the license was
    ///   `ISSUED` and this call won the one-time claim, binding
    ///   `hardware_id` and stamping `activated_at`;
    /// - [`Duplicate`](VerificationOutcome::Duplicate) — the license is
    ///   already `IN_USE`; the normal replay response, the row is not
    ///   touched and the stored hardware binding is authoritative;
    /// - [`Invalid`](VerificationOutcome::Invalid) — no eligible license.
    ///   Not-found, expired, kill-switched, and stopped are deliberately
    ///   indistinguishable here.
    ///
    /// Every attempt is recorded in the auth log; an `Err` means storage
    /// failed and must never be read as any of the three outcomes.
    pub async fn verify(
        &self,
        license_key: &str,
        client_id: &str,
        hardware_id: &str,
        caller_ip: &str,
    ) -> AppResult<VerificationOutcome> {
        let Some(license) = self
            .store
            .find_by_key_and_client(license_key, client_id)
            .await?
        else {
            debug!(client_id, "Verification matched no license");
            self.record(None, VerificationOutcome::Invalid, caller_ip)
                .await?;
            return Ok(VerificationOutcome::Invalid);
        };

        if !license.is_active || license.expires_at <= Utc::now() {
            debug!(
                license_id = license.id,
                is_active = license.is_active,
                expires_at = %license.expires_at,
                "Verification against ineligible license"
            );
            self.record(Some(license.id), VerificationOutcome::Invalid, caller_ip)
                .await?;
            return Ok(VerificationOutcome::Invalid);
        }

        match license.status {
            LicenseStatus::InUse => {
                self.record(Some(license.id), VerificationOutcome::Duplicate, caller_ip)
                    .await?;
                Ok(VerificationOutcome::Duplicate)
            }
            LicenseStatus::Stopped => {
                debug!(license_id = license.id, "Verification against stopped license");
                self.record(Some(license.id), VerificationOutcome::Invalid, caller_ip)
                    .await?;
                Ok(VerificationOutcome::Invalid)
            }
            LicenseStatus::Issued => self.try_first_activation(&license, hardware_id, caller_ip).await,
        }
    }

    /// Attempt the one-time `ISSUED → IN_USE` claim.
    ///
    /// The store's compare-and-swap guarantees at most one winner per
    /// license; a lost claim is re-read once to tell "someone else just
    /// activated it" apart from "an admin action made it ineligible".
    async fn try_first_activation(
        &self,
        license: &License,
        hardware_id: &str,
        caller_ip: &str,
    ) -> AppResult<VerificationOutcome> {
        if let Some(activated) = self.store.claim_activation(license.id, hardware_id).await? {
            info!(
                license_id = activated.id,
                client_id = %activated.client_id,
                "License activated"
            );
            self.record(Some(activated.id), VerificationOutcome::Success, caller_ip)
                .await?;
            return Ok(VerificationOutcome::Success);
        }

        let outcome = match self.store.find_by_id(license.id).await? {
            Some(current) if current.status == LicenseStatus::InUse => {
                VerificationOutcome::Duplicate
            }
            _ => VerificationOutcome::Invalid,
        };
        self.record(Some(license.id), outcome, caller_ip).await?;
        Ok(outcome)
    }

    /// Append an auth log row for one verification attempt.
    async fn record(
        &self,
        license_id: Option<i64>,
        outcome: VerificationOutcome,
        caller_ip: &str,
    ) -> AppResult<()> {
        self.store
            .record_attempt(NewAuthLog {
                license_id,
                status: outcome.is_success(),
                client_ip: caller_ip.to_string(),
                message: outcome.message().to_string(),
            })
            .await
    }

    /// Stop a license. Idempotent: stopping a `STOPPED` license is a no-op
    /// success. Once stopped, a license can never re-enter `IN_USE`.
    pub async fn stop(&self, license_id: i64) -> AppResult<License> {
        let license = self
            .store
            .find_by_id(license_id)
            .await?
            .ok_or_else(|| AppError::not_found("License not found"))?;

        if license.status == LicenseStatus::Stopped {
            return Ok(license);
        }

        license.status.transition(LicenseStatus::Stopped)?;
        let stopped = self.store.mark_stopped(license_id).await?;
        info!(license_id, from = %license.status, "License stopped");
        Ok(stopped)
    }

    /// Toggle the `is_active` kill-switch. Does not touch `status`: a
    /// stopped license stays unverifiable regardless of this flag.
    pub async fn set_active(&self, license_id: i64, active: bool) -> AppResult<License> {
        let updated = self.store.set_active_flag(license_id, active).await?;
        info!(license_id, active, "License kill-switch toggled");
        Ok(updated)
    }

    /// List every active `IN_USE` license annotated with whether the
    /// liveness registry reports a running client process.
    ///
    /// The registry lookup is best-effort: on failure or timeout the
    /// listing still succeeds with `running = false` throughout.
    pub async fn list_running_clients(&self) -> AppResult<Vec<RunningClient>> {
        let licenses = self.store.find_in_use().await?;

        let active_keys = match tokio::time::timeout(
            self.liveness_timeout,
            self.liveness.active_license_keys(),
        )
        .await
        {
            Ok(Ok(keys)) => keys,
            Ok(Err(e)) => {
                warn!(error = %e, "Liveness registry lookup failed");
                HashSet::new()
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.liveness_timeout.as_millis() as u64,
                    "Liveness registry lookup timed out"
                );
                HashSet::new()
            }
        };

        Ok(licenses
            .into_iter()
            .map(|license| RunningClient {
                running: active_keys.contains(&license.license_key),
                license,
            })
            .collect())
    }
}

impl fmt::Debug for ActivationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivationEngine")
            .field("liveness_timeout", &self.liveness_timeout)
            .finish_non_exhaustive()
    }
}
