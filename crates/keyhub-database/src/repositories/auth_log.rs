//! Auth log repository implementation.
//!
//! Read-only by design: the activation engine is the only writer of
//! `auth_logs` rows (through its store), so this repository exposes no
//! insert, update, or delete.

use sqlx::PgPool;

use keyhub_core::error::{AppError, ErrorKind};
use keyhub_core::result::AppResult;
use keyhub_core::types::pagination::{PageRequest, PageResponse};
use keyhub_entity::authlog::AuthLogWithContext;

/// Repository for reading the append-only auth log.
#[derive(Debug, Clone)]
pub struct AuthLogRepository {
    pool: PgPool,
}

impl AuthLogRepository {
    /// Create a new auth log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List log entries newest-first, optionally filtered by outcome,
    /// each joined with its license's program/client context.
    ///
    /// Orphaned rows (license deleted, or the attempt matched no license)
    /// are included with null context.
    pub async fn search(
        &self,
        status: Option<bool>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuthLogWithContext>> {
        let where_clause = if status.is_some() {
            "WHERE a.status = $1"
        } else {
            ""
        };

        let count_sql = format!("SELECT COUNT(*) FROM auth_logs a {where_clause}");
        let (limit_idx, offset_idx) = if status.is_some() { (2, 3) } else { (1, 2) };
        let select_sql = format!(
            "SELECT a.id, a.license_id, a.status, a.client_ip, a.message, a.created_at, \
                    l.program_name, l.client_id \
             FROM auth_logs a \
             LEFT JOIN licenses l ON l.id = a.license_id \
             {where_clause} \
             ORDER BY a.created_at DESC LIMIT ${limit_idx} OFFSET ${offset_idx}"
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, AuthLogWithContext>(&select_sql);
        if let Some(s) = status {
            count_query = count_query.bind(s);
            select_query = select_query.bind(s);
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count auth logs", e)
        })?;

        let entries = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to search auth logs", e)
            })?;

        Ok(PageResponse::new(
            entries,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
