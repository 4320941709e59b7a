//! License issuance and admin management.
//!
//! Everything here is ordinary create/read/delete plumbing; lifecycle
//! writes (`status`, `hardware_id`) belong to the activation engine and
//! are not reachable from this service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use keyhub_core::AppResult;
use keyhub_core::error::AppError;
use keyhub_core::types::pagination::{PageRequest, PageResponse};
use keyhub_database::repositories::LicenseRepository;
use keyhub_entity::license::{BulkDeleteFilter, License, LicenseSearch, NewLicense};

/// Request to generate a numbered batch of licenses for one program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkGenerateRequest {
    /// Product identifier.
    pub program_name: String,
    /// Client id prefix; ids become `prefix0001`, `prefix0002`, …
    pub client_id_prefix: String,
    /// Number of licenses to generate.
    pub count: u32,
    /// Hard expiry applied to every license in the batch.
    pub expires_at: DateTime<Utc>,
}

/// One import row; the license key is generated server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRow {
    /// Product identifier.
    pub program_name: String,
    /// Customer/tenant identifier.
    pub client_id: String,
    /// Hard expiry.
    pub expires_at: DateTime<Utc>,
}

/// One bulk-import row restoring a previously exported license, key and
/// issuance time included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkImportRow {
    /// Product identifier.
    pub program_name: String,
    /// Customer/tenant identifier.
    pub client_id: String,
    /// The original license key.
    pub license_key: String,
    /// Hard expiry.
    pub expires_at: DateTime<Utc>,
    /// Original issuance time.
    pub created_at: DateTime<Utc>,
}

/// Admin license management service.
#[derive(Debug, Clone)]
pub struct LicenseService {
    /// License repository.
    licenses: Arc<LicenseRepository>,
}

impl LicenseService {
    /// Creates a new license service.
    pub fn new(licenses: Arc<LicenseRepository>) -> Self {
        Self { licenses }
    }

    /// Search the license inventory with the admin listing filters.
    pub async fn search(
        &self,
        criteria: &LicenseSearch,
        page: &PageRequest,
    ) -> AppResult<PageResponse<License>> {
        self.licenses.search(criteria, page).await
    }

    /// Get a single license.
    pub async fn get(&self, id: i64) -> AppResult<License> {
        self.licenses
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("License not found"))
    }

    /// Create one license with an explicit key.
    pub async fn create_single(
        &self,
        program_name: String,
        client_id: String,
        license_key: String,
        expires_at: DateTime<Utc>,
    ) -> AppResult<License> {
        let license = self
            .licenses
            .create(&NewLicense {
                program_name,
                client_id,
                license_key,
                expires_at,
                created_at: None,
            })
            .await?;
        info!(license_id = license.id, client_id = %license.client_id, "License created");
        Ok(license)
    }

    /// Generate a numbered batch of licenses with fresh UUID keys.
    pub async fn bulk_generate(&self, request: &BulkGenerateRequest) -> AppResult<Vec<License>> {
        if request.count == 0 {
            return Err(AppError::validation("Batch count must be at least 1"));
        }

        let batch: Vec<NewLicense> = (1..=request.count)
            .map(|index| NewLicense {
                program_name: request.program_name.clone(),
                client_id: format!("{}{:04}", request.client_id_prefix, index),
                license_key: Uuid::new_v4().to_string(),
                expires_at: request.expires_at,
                created_at: None,
            })
            .collect();

        let created = self.licenses.create_many(&batch).await?;
        info!(
            program_name = %request.program_name,
            count = created.len(),
            "License batch generated"
        );
        Ok(created)
    }

    /// Import rows with server-generated keys.
    pub async fn import(&self, rows: &[ImportRow]) -> AppResult<Vec<License>> {
        if rows.is_empty() {
            return Err(AppError::validation("Import batch is empty"));
        }

        let batch: Vec<NewLicense> = rows
            .iter()
            .map(|row| NewLicense {
                program_name: row.program_name.clone(),
                client_id: row.client_id.clone(),
                license_key: Uuid::new_v4().to_string(),
                expires_at: row.expires_at,
                created_at: None,
            })
            .collect();

        self.licenses.create_many(&batch).await
    }

    /// Restore previously exported rows, keys and issuance times included.
    pub async fn bulk_import(&self, rows: &[BulkImportRow]) -> AppResult<Vec<License>> {
        if rows.is_empty() {
            return Err(AppError::validation("Import batch is empty"));
        }

        let batch: Vec<NewLicense> = rows
            .iter()
            .map(|row| NewLicense {
                program_name: row.program_name.clone(),
                client_id: row.client_id.clone(),
                license_key: row.license_key.clone(),
                expires_at: row.expires_at,
                created_at: Some(row.created_at),
            })
            .collect();

        self.licenses.create_many(&batch).await
    }

    /// The full inventory, newest first, for export.
    pub async fn export_all(&self) -> AppResult<Vec<License>> {
        self.licenses.find_all_ordered().await
    }

    /// Delete one license. The auth log keeps its rows with a nulled
    /// reference.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.licenses.delete(id).await? {
            return Err(AppError::not_found("License not found"));
        }
        info!(license_id = id, "License deleted");
        Ok(())
    }

    /// Bulk-delete by program and/or status. At least one criterion is
    /// required so a malformed request cannot wipe the inventory.
    pub async fn bulk_delete(&self, filter: &BulkDeleteFilter) -> AppResult<u64> {
        if filter.program_name.is_none() && filter.status.is_none() {
            return Err(AppError::validation(
                "Bulk delete requires a program name or status filter",
            ));
        }

        let deleted = self.licenses.delete_by_filter(filter).await?;
        info!(deleted, "Licenses bulk-deleted");
        Ok(deleted)
    }

    /// Set or clear the display-only user name label.
    pub async fn set_user_name(&self, id: i64, user_name: Option<&str>) -> AppResult<License> {
        self.licenses.set_user_name(id, user_name).await
    }

    /// Distinct program names for filter dropdowns.
    pub async fn programs(&self) -> AppResult<Vec<String>> {
        self.licenses.distinct_programs().await
    }
}
