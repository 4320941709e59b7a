//! Shared test doubles for engine tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use tokio::sync::Mutex;

use keyhub_core::AppResult;
use keyhub_core::error::AppError;
use keyhub_core::traits::LivenessSource;
use keyhub_entity::authlog::NewAuthLog;
use keyhub_entity::license::{ActivationStore, License, LicenseStatus};
use keyhub_service::activation::ActivationEngine;

/// In-memory [`ActivationStore`] with the same claim semantics as the
/// PostgreSQL implementation: the activation claim is a compare-and-swap
/// executed under a single lock.
#[derive(Default)]
pub struct MemoryStore {
    licenses: Mutex<HashMap<i64, License>>,
    logs: Mutex<Vec<NewAuthLog>>,
    next_id: AtomicI64,
    fail_logging: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    /// Insert a license, assigning an id.
    pub async fn insert(&self, mut license: License) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        license.id = id;
        self.licenses.lock().await.insert(id, license);
        id
    }

    pub async fn get(&self, id: i64) -> License {
        self.licenses.lock().await.get(&id).cloned().expect("license exists")
    }

    pub async fn logs(&self) -> Vec<NewAuthLog> {
        self.logs.lock().await.clone()
    }

    /// Make every subsequent `record_attempt` fail.
    pub fn break_logging(&self) {
        self.fail_logging.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ActivationStore for MemoryStore {
    async fn find_by_key_and_client(
        &self,
        license_key: &str,
        client_id: &str,
    ) -> AppResult<Option<License>> {
        Ok(self
            .licenses
            .lock()
            .await
            .values()
            .find(|l| l.license_key == license_key && l.client_id == client_id)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<License>> {
        Ok(self.licenses.lock().await.get(&id).cloned())
    }

    async fn claim_activation(&self, id: i64, hardware_id: &str) -> AppResult<Option<License>> {
        let mut licenses = self.licenses.lock().await;
        let Some(license) = licenses.get_mut(&id) else {
            return Ok(None);
        };

        let now = Utc::now();
        if license.status != LicenseStatus::Issued || !license.is_active || license.expires_at <= now
        {
            return Ok(None);
        }

        license.status = LicenseStatus::InUse;
        license.hardware_id = Some(hardware_id.to_string());
        license.activated_at = Some(now);
        license.updated_at = now;
        Ok(Some(license.clone()))
    }

    async fn mark_stopped(&self, id: i64) -> AppResult<License> {
        let mut licenses = self.licenses.lock().await;
        let license = licenses
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("License not found"))?;
        license.status = LicenseStatus::Stopped;
        license.updated_at = Utc::now();
        Ok(license.clone())
    }

    async fn set_active_flag(&self, id: i64, active: bool) -> AppResult<License> {
        let mut licenses = self.licenses.lock().await;
        let license = licenses
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("License not found"))?;
        license.is_active = active;
        license.updated_at = Utc::now();
        Ok(license.clone())
    }

    async fn find_in_use(&self) -> AppResult<Vec<License>> {
        let mut in_use: Vec<License> = self
            .licenses
            .lock()
            .await
            .values()
            .filter(|l| l.status == LicenseStatus::InUse && l.is_active)
            .cloned()
            .collect();
        in_use.sort_by(|a, b| b.client_id.cmp(&a.client_id));
        Ok(in_use)
    }

    async fn record_attempt(&self, attempt: NewAuthLog) -> AppResult<()> {
        if self.fail_logging.load(Ordering::SeqCst) {
            return Err(AppError::database("auth log insert failed"));
        }
        self.logs.lock().await.push(attempt);
        Ok(())
    }
}

/// Liveness source answering with a fixed key set.
pub struct StaticLiveness(pub HashSet<String>);

#[async_trait]
impl LivenessSource for StaticLiveness {
    async fn active_license_keys(&self) -> AppResult<HashSet<String>> {
        Ok(self.0.clone())
    }
}

/// Liveness source that always errors.
pub struct FailingLiveness;

#[async_trait]
impl LivenessSource for FailingLiveness {
    async fn active_license_keys(&self) -> AppResult<HashSet<String>> {
        Err(AppError::external_service("registry unreachable"))
    }
}

/// Liveness source that never answers inside any sane bound.
pub struct HangingLiveness;

#[async_trait]
impl LivenessSource for HangingLiveness {
    async fn active_license_keys(&self) -> AppResult<HashSet<String>> {
        tokio::time::sleep(Duration::from_secs(600)).await;
        Ok(HashSet::new())
    }
}

/// Engine over the given store with an empty liveness source.
pub fn engine(store: Arc<MemoryStore>) -> ActivationEngine {
    ActivationEngine::new(
        store,
        Arc::new(StaticLiveness(HashSet::new())),
        Duration::from_millis(200),
    )
}

/// Engine with an explicit liveness source and timeout.
pub fn engine_with_liveness(
    store: Arc<MemoryStore>,
    liveness: Arc<dyn LivenessSource>,
    timeout: Duration,
) -> ActivationEngine {
    ActivationEngine::new(store, liveness, timeout)
}

/// An `ISSUED`, active license expiring tomorrow.
pub fn issued_license(license_key: &str, client_id: &str) -> License {
    let now = Utc::now();
    License {
        id: 0,
        license_key: license_key.to_string(),
        program_name: "cad-viewer".to_string(),
        client_id: client_id.to_string(),
        hardware_id: None,
        user_name: None,
        is_active: true,
        status: LicenseStatus::Issued,
        activated_at: None,
        last_checked_at: None,
        expires_at: now + ChronoDuration::days(1),
        created_at: now,
        updated_at: now,
    }
}
