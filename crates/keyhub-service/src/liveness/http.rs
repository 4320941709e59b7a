//! HTTP liveness registry client.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use keyhub_core::AppResult;
use keyhub_core::config::liveness::LivenessConfig;
use keyhub_core::error::AppError;
use keyhub_core::traits::LivenessSource;

/// One running client as reported by the registry.
#[derive(Debug, Deserialize)]
struct ActiveClient {
    license_key: String,
}

/// Registry response payload.
#[derive(Debug, Deserialize)]
struct ActiveClientsResponse {
    active_clients: Vec<ActiveClient>,
}

/// [`LivenessSource`] backed by the external heartbeat registry's HTTP
/// endpoint.
#[derive(Debug, Clone)]
pub struct HttpLivenessSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLivenessSource {
    /// Creates a new HTTP liveness source from configuration.
    ///
    /// The request timeout doubles the caller-side bound so a stalled
    /// registry never holds a connection open.
    pub fn new(config: &LivenessConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::external_service(format!("Failed to build liveness client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl LivenessSource for HttpLivenessSource {
    async fn active_license_keys(&self) -> AppResult<HashSet<String>> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| {
                AppError::external_service(format!("Liveness registry unreachable: {e}"))
            })?
            .error_for_status()
            .map_err(|e| {
                AppError::external_service(format!("Liveness registry returned an error: {e}"))
            })?;

        let payload: ActiveClientsResponse = response.json().await.map_err(|e| {
            AppError::external_service(format!("Malformed liveness payload: {e}"))
        })?;

        Ok(payload
            .active_clients
            .into_iter()
            .map(|c| c.license_key)
            .collect())
    }
}
