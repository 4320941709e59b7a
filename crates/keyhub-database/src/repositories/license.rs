//! License repository implementation.
//!
//! Also implements [`ActivationStore`], the persistence seam the activation
//! engine writes through. The `ISSUED → IN_USE` claim is a conditional
//! single-statement UPDATE so the row itself serializes concurrent
//! verifications.

use async_trait::async_trait;
use sqlx::PgPool;

use keyhub_core::error::{AppError, ErrorKind};
use keyhub_core::result::AppResult;
use keyhub_core::types::pagination::{PageRequest, PageResponse};
use keyhub_entity::authlog::NewAuthLog;
use keyhub_entity::license::{
    ActivationStore, BulkDeleteFilter, License, LicenseSearch, MonthlyLicenseCount, NewLicense,
};

/// Repository for license records.
#[derive(Debug, Clone)]
pub struct LicenseRepository {
    pool: PgPool,
}

impl LicenseRepository {
    /// Create a new license repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a license by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<License>> {
        sqlx::query_as::<_, License>("SELECT * FROM licenses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find license", e))
    }

    /// Find a license by its key and client id. Both must match.
    pub async fn find_by_key_and_client(
        &self,
        license_key: &str,
        client_id: &str,
    ) -> AppResult<Option<License>> {
        sqlx::query_as::<_, License>(
            "SELECT * FROM licenses WHERE license_key = $1 AND client_id = $2",
        )
        .bind(license_key)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find license", e))
    }

    /// Search licenses with the admin listing filters.
    pub async fn search(
        &self,
        criteria: &LicenseSearch,
        page: &PageRequest,
    ) -> AppResult<PageResponse<License>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        let pattern = criteria
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));
        if pattern.is_some() {
            conditions.push(format!(
                "(program_name ILIKE ${param_idx} OR client_id ILIKE ${param_idx} \
                 OR license_key ILIKE ${param_idx})"
            ));
            param_idx += 1;
        }
        if criteria.status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        let date_range = match (criteria.date_field, criteria.date_from, criteria.date_to) {
            (Some(field), Some(from), Some(to)) => {
                conditions.push(format!(
                    "{col} >= ${param_idx} AND {col} <= ${}",
                    param_idx + 1,
                    col = field.column()
                ));
                param_idx += 2;
                Some((from, to))
            }
            _ => None,
        };

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM licenses {where_clause}");
        let select_sql = format!(
            "SELECT * FROM licenses {where_clause} ORDER BY client_id DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, License>(&select_sql);

        if let Some(p) = &pattern {
            count_query = count_query.bind(p.clone());
            select_query = select_query.bind(p.clone());
        }
        if let Some(status) = criteria.status {
            count_query = count_query.bind(status);
            select_query = select_query.bind(status);
        }
        if let Some((from, to)) = date_range {
            count_query = count_query.bind(from).bind(to);
            select_query = select_query.bind(from).bind(to);
        }

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count licenses", e))?;

        let licenses = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to search licenses", e)
            })?;

        Ok(PageResponse::new(
            licenses,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Create a single license. New rows always start `ISSUED` and active.
    pub async fn create(&self, data: &NewLicense) -> AppResult<License> {
        sqlx::query_as::<_, License>(
            "INSERT INTO licenses (program_name, client_id, license_key, expires_at, created_at) \
             VALUES ($1, $2, $3, $4, COALESCE($5, NOW())) RETURNING *",
        )
        .bind(&data.program_name)
        .bind(&data.client_id)
        .bind(&data.license_key)
        .bind(data.expires_at)
        .bind(data.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create license", e))
    }

    /// Create a batch of licenses in one transaction. All rows are created
    /// or none.
    pub async fn create_many(&self, batch: &[NewLicense]) -> AppResult<Vec<License>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let mut created = Vec::with_capacity(batch.len());
        for data in batch {
            let license = sqlx::query_as::<_, License>(
                "INSERT INTO licenses (program_name, client_id, license_key, expires_at, created_at) \
                 VALUES ($1, $2, $3, $4, COALESCE($5, NOW())) RETURNING *",
            )
            .bind(&data.program_name)
            .bind(&data.client_id)
            .bind(&data.license_key)
            .bind(data.expires_at)
            .bind(data.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create license batch", e)
            })?;
            created.push(license);
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit license batch", e)
        })?;

        Ok(created)
    }

    /// Delete a license by ID. Returns `true` if a row was removed.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM licenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete license", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Bulk-delete licenses matching the filter. Returns the number of
    /// deleted rows. Auth log rows survive with a nulled reference.
    pub async fn delete_by_filter(&self, filter: &BulkDeleteFilter) -> AppResult<u64> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if filter.program_name.is_some() {
            conditions.push(format!("program_name = ${param_idx}"));
            param_idx += 1;
        }
        if filter.status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!("DELETE FROM licenses {where_clause}");
        let mut query = sqlx::query(&sql);
        if let Some(program) = &filter.program_name {
            query = query.bind(program.clone());
        }
        if let Some(status) = filter.status {
            query = query.bind(status);
        }

        let result = query.execute(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to bulk-delete licenses", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Set the display-only user name label.
    pub async fn set_user_name(&self, id: i64, user_name: Option<&str>) -> AppResult<License> {
        sqlx::query_as::<_, License>(
            "UPDATE licenses SET user_name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update user name", e))?
        .ok_or_else(|| AppError::not_found("License not found"))
    }

    /// All licenses, newest first, for export.
    pub async fn find_all_ordered(&self) -> AppResult<Vec<License>> {
        sqlx::query_as::<_, License>("SELECT * FROM licenses ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list licenses", e))
    }

    /// Distinct program names, ascending.
    pub async fn distinct_programs(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT program_name FROM licenses ORDER BY program_name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list programs", e))
    }

    /// Total number of licenses.
    pub async fn count_all(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM licenses")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count licenses", e))
    }

    /// Number of licenses with the kill-switch on.
    pub async fn count_active(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM licenses WHERE is_active = TRUE")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count active licenses", e)
            })
    }

    /// Number of active licenses currently `IN_USE`.
    pub async fn count_in_use(&self) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM licenses WHERE status = 'IN_USE' AND is_active = TRUE",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count in-use licenses", e)
        })
    }

    /// Issued/in-use counts per month for the trailing six months.
    pub async fn monthly_counts(&self) -> AppResult<Vec<MonthlyLicenseCount>> {
        sqlx::query_as::<_, MonthlyLicenseCount>(
            "SELECT to_char(date_trunc('month', created_at), 'YYYY-MM') AS month, \
                    COUNT(*) AS total, \
                    COUNT(*) FILTER (WHERE status = 'IN_USE') AS in_use \
             FROM licenses \
             WHERE created_at >= date_trunc('month', NOW()) - INTERVAL '5 months' \
             GROUP BY 1 ORDER BY 1",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load monthly counts", e)
        })
    }
}

#[async_trait]
impl ActivationStore for LicenseRepository {
    async fn find_by_key_and_client(
        &self,
        license_key: &str,
        client_id: &str,
    ) -> AppResult<Option<License>> {
        LicenseRepository::find_by_key_and_client(self, license_key, client_id).await
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<License>> {
        LicenseRepository::find_by_id(self, id).await
    }

    async fn claim_activation(&self, id: i64, hardware_id: &str) -> AppResult<Option<License>> {
        // Compare-and-swap on status: under concurrent claims for one row
        // exactly one UPDATE matches. The eligibility re-check keeps a
        // racing stop/deactivate/expiry from being overwritten.
        sqlx::query_as::<_, License>(
            "UPDATE licenses \
             SET status = 'IN_USE', hardware_id = $2, activated_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status = 'ISSUED' AND is_active = TRUE AND expires_at > NOW() \
             RETURNING *",
        )
        .bind(id)
        .bind(hardware_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim activation", e))
    }

    async fn mark_stopped(&self, id: i64) -> AppResult<License> {
        sqlx::query_as::<_, License>(
            "UPDATE licenses SET status = 'STOPPED', updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to stop license", e))?
        .ok_or_else(|| AppError::not_found("License not found"))
    }

    async fn set_active_flag(&self, id: i64, active: bool) -> AppResult<License> {
        sqlx::query_as::<_, License>(
            "UPDATE licenses SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to toggle license", e))?
        .ok_or_else(|| AppError::not_found("License not found"))
    }

    async fn find_in_use(&self) -> AppResult<Vec<License>> {
        sqlx::query_as::<_, License>(
            "SELECT * FROM licenses WHERE status = 'IN_USE' AND is_active = TRUE \
             ORDER BY client_id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list in-use licenses", e)
        })
    }

    async fn record_attempt(&self, attempt: NewAuthLog) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO auth_logs (license_id, status, client_ip, message) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(attempt.license_id)
        .bind(attempt.status)
        .bind(&attempt.client_ip)
        .bind(&attempt.message)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record attempt", e))?;
        Ok(())
    }
}
