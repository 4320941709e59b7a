//! Liveness registry configuration.

use serde::{Deserialize, Serialize};

/// Settings for the external liveness registry that reports which
/// activated licenses currently have a running client process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessConfig {
    /// Whether the liveness cross-reference is enabled at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Registry endpoint returning the active client list.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Upper bound on the registry call. On timeout the listing proceeds
    /// without liveness data.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8000/get_active_clients".to_string()
}

fn default_timeout() -> u64 {
    3
}
