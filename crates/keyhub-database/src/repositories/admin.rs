//! Admin account repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use keyhub_core::error::{AppError, ErrorKind};
use keyhub_core::result::AppResult;
use keyhub_core::types::pagination::{PageRequest, PageResponse};
use keyhub_entity::admin::{Admin, AdminRole, NewAdmin};

/// Repository for admin accounts.
#[derive(Debug, Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    /// Create a new admin repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an admin by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Admin>> {
        sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find admin", e))
    }

    /// Find an admin by login email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Admin>> {
        sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find admin", e))
    }

    /// List admins newest-first with an optional email/name search.
    pub async fn search(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Admin>> {
        let pattern = search
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));
        let where_clause = if pattern.is_some() {
            "WHERE email ILIKE $1 OR name ILIKE $1"
        } else {
            ""
        };

        let count_sql = format!("SELECT COUNT(*) FROM admins {where_clause}");
        let (limit_idx, offset_idx) = if pattern.is_some() { (2, 3) } else { (1, 2) };
        let select_sql = format!(
            "SELECT * FROM admins {where_clause} ORDER BY created_at DESC \
             LIMIT ${limit_idx} OFFSET ${offset_idx}"
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, Admin>(&select_sql);
        if let Some(p) = &pattern {
            count_query = count_query.bind(p.clone());
            select_query = select_query.bind(p.clone());
        }

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count admins", e))?;

        let admins = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search admins", e))?;

        Ok(PageResponse::new(
            admins,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Create an admin account. The email must be unique.
    pub async fn create(&self, data: &NewAdmin) -> AppResult<Admin> {
        sqlx::query_as::<_, Admin>(
            "INSERT INTO admins (email, name, password_hash, role) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.name)
        .bind(&data.password_hash)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::conflict("An admin with this email already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create admin", e),
        })
    }

    /// Update an admin's name, role, and/or password hash.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        role: Option<AdminRole>,
        password_hash: Option<&str>,
    ) -> AppResult<Admin> {
        sqlx::query_as::<_, Admin>(
            "UPDATE admins SET \
                 name = COALESCE($2, name), \
                 role = COALESCE($3, role), \
                 password_hash = COALESCE($4, password_hash), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(role)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update admin", e))?
        .ok_or_else(|| AppError::not_found("Admin not found"))
    }

    /// Delete an admin account. Returns `true` if a row was removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete admin", e))?;
        Ok(result.rows_affected() > 0)
    }
}
