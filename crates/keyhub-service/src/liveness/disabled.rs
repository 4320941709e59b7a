//! No-op liveness source used when the registry integration is disabled.

use std::collections::HashSet;

use async_trait::async_trait;

use keyhub_core::AppResult;
use keyhub_core::traits::LivenessSource;

/// Reports no running clients. Used when `liveness.enabled = false`; the
/// running-clients listing then shows `running = false` throughout.
#[derive(Debug, Clone, Default)]
pub struct DisabledLiveness;

#[async_trait]
impl LivenessSource for DisabledLiveness {
    async fn active_license_keys(&self) -> AppResult<HashSet<String>> {
        Ok(HashSet::new())
    }
}
