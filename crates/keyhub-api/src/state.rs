//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use keyhub_auth::jwt::JwtDecoder;
use keyhub_core::config::AppConfig;
use keyhub_database::repositories::AuthLogRepository;
use keyhub_service::account::AccountService;
use keyhub_service::activation::ActivationEngine;
use keyhub_service::license::LicenseService;
use keyhub_service::stats::StatsService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Core ─────────────────────────────────────────────────
    /// The license activation engine
    pub activation_engine: Arc<ActivationEngine>,

    // ── Services & read-side repositories ────────────────────
    /// Admin license management service
    pub license_service: Arc<LicenseService>,
    /// Dashboard statistics service
    pub stats_service: Arc<StatsService>,
    /// Admin account service
    pub account_service: Arc<AccountService>,
    /// Read-only auth log repository
    pub auth_log_repo: Arc<AuthLogRepository>,
}
