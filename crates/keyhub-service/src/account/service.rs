//! Admin account management and login.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use keyhub_auth::jwt::{JwtDecoder, JwtEncoder, TokenPair};
use keyhub_auth::password::PasswordHasher;
use keyhub_core::AppResult;
use keyhub_core::error::AppError;
use keyhub_core::types::pagination::{PageRequest, PageResponse};
use keyhub_database::repositories::AdminRepository;
use keyhub_entity::admin::{Admin, AdminRole, NewAdmin};

/// Request to create an admin account.
#[derive(Debug, Clone)]
pub struct CreateAdminRequest {
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
    /// Role.
    pub role: AdminRole,
}

/// Request to update an admin account. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAdminRequest {
    /// New display name.
    pub name: Option<String>,
    /// New role.
    pub role: Option<AdminRole>,
    /// New plaintext password.
    pub password: Option<String>,
}

/// Admin login and account management service.
#[derive(Debug, Clone)]
pub struct AccountService {
    admins: Arc<AdminRepository>,
    hasher: Arc<PasswordHasher>,
    jwt_encoder: Arc<JwtEncoder>,
    jwt_decoder: Arc<JwtDecoder>,
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        admins: Arc<AdminRepository>,
        hasher: Arc<PasswordHasher>,
        jwt_encoder: Arc<JwtEncoder>,
        jwt_decoder: Arc<JwtDecoder>,
    ) -> Self {
        Self {
            admins,
            hasher,
            jwt_encoder,
            jwt_decoder,
        }
    }

    /// Authenticate an admin and issue a token pair.
    ///
    /// Unknown email and wrong password return the same error so login
    /// probing cannot enumerate accounts.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(Admin, TokenPair)> {
        let admin = match self.admins.find_by_email(email).await? {
            Some(admin) => admin,
            None => {
                warn!(email, "Login attempt for unknown admin");
                return Err(AppError::unauthorized("Invalid email or password"));
            }
        };

        if !self.hasher.verify_password(password, &admin.password_hash)? {
            warn!(email, "Login attempt with wrong password");
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        let tokens = self
            .jwt_encoder
            .generate_token_pair(admin.id, &admin.email, admin.role)?;
        info!(admin_id = %admin.id, "Admin logged in");
        Ok((admin, tokens))
    }

    /// Exchange a refresh token for a fresh token pair.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.jwt_decoder.decode_refresh_token(refresh_token)?;
        let admin = self
            .admins
            .find_by_id(claims.admin_id())
            .await?
            .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

        self.jwt_encoder
            .generate_token_pair(admin.id, &admin.email, admin.role)
    }

    /// Load the current admin's account.
    pub async fn me(&self, admin_id: Uuid) -> AppResult<Admin> {
        self.admins
            .find_by_id(admin_id)
            .await?
            .ok_or_else(|| AppError::not_found("Admin not found"))
    }

    /// List admin accounts with an optional email/name search.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Admin>> {
        self.admins.search(search, page).await
    }

    /// Create an admin account with a hashed password.
    pub async fn create(&self, request: CreateAdminRequest) -> AppResult<Admin> {
        let password_hash = self.hasher.hash_password(&request.password)?;
        let admin = self
            .admins
            .create(&NewAdmin {
                email: request.email,
                name: request.name,
                password_hash,
                role: request.role,
            })
            .await?;
        info!(admin_id = %admin.id, "Admin account created");
        Ok(admin)
    }

    /// Update an admin's name, role, and/or password.
    pub async fn update(&self, id: Uuid, request: UpdateAdminRequest) -> AppResult<Admin> {
        let password_hash = match &request.password {
            Some(password) => Some(self.hasher.hash_password(password)?),
            None => None,
        };

        self.admins
            .update(
                id,
                request.name.as_deref(),
                request.role,
                password_hash.as_deref(),
            )
            .await
    }

    /// Delete an admin account.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.admins.delete(id).await? {
            return Err(AppError::not_found("Admin not found"));
        }
        info!(admin_id = %id, "Admin account deleted");
        Ok(())
    }
}
