//! KeyHub Server — License Issuance and Activation Administration
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use keyhub_core::config::AppConfig;
use keyhub_core::error::AppError;
use keyhub_core::traits::LivenessSource;
use keyhub_entity::license::ActivationStore;

#[tokio::main]
async fn main() {
    let env = std::env::var("KEYHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting KeyHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = keyhub_database::DatabasePool::connect(&config.database).await?;
    keyhub_database::migration::run_migrations(db.pool()).await?;
    let db_pool = db.into_pool();

    // ── Step 2: Repositories ─────────────────────────────────────
    let license_repo = Arc::new(keyhub_database::repositories::LicenseRepository::new(
        db_pool.clone(),
    ));
    let auth_log_repo = Arc::new(keyhub_database::repositories::AuthLogRepository::new(
        db_pool.clone(),
    ));
    let admin_repo = Arc::new(keyhub_database::repositories::AdminRepository::new(
        db_pool.clone(),
    ));

    // ── Step 3: Auth primitives ──────────────────────────────────
    let password_hasher = Arc::new(keyhub_auth::password::PasswordHasher::new());
    let jwt_encoder = Arc::new(keyhub_auth::jwt::JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(keyhub_auth::jwt::JwtDecoder::new(&config.auth));

    // ── Step 4: Liveness source ──────────────────────────────────
    let liveness: Arc<dyn LivenessSource> = if config.liveness.enabled {
        tracing::info!(endpoint = %config.liveness.endpoint, "Liveness registry enabled");
        Arc::new(keyhub_service::liveness::HttpLivenessSource::new(
            &config.liveness,
        )?)
    } else {
        tracing::info!("Liveness registry disabled");
        Arc::new(keyhub_service::liveness::DisabledLiveness)
    };

    // ── Step 5: Activation engine + services ─────────────────────
    let activation_engine = Arc::new(keyhub_service::activation::ActivationEngine::new(
        Arc::clone(&license_repo) as Arc<dyn ActivationStore>,
        liveness,
        Duration::from_secs(config.liveness.timeout_seconds),
    ));
    let license_service = Arc::new(keyhub_service::license::LicenseService::new(Arc::clone(
        &license_repo,
    )));
    let stats_service = Arc::new(keyhub_service::stats::StatsService::new(Arc::clone(
        &license_repo,
    )));
    let account_service = Arc::new(keyhub_service::account::AccountService::new(
        Arc::clone(&admin_repo),
        Arc::clone(&password_hasher),
        Arc::clone(&jwt_encoder),
        Arc::clone(&jwt_decoder),
    ));

    // ── Step 6: Build and start HTTP server ──────────────────────
    let app_state = keyhub_api::AppState {
        config: Arc::new(config.clone()),
        db_pool,
        jwt_decoder,
        activation_engine,
        license_service,
        stats_service,
        account_service,
        auth_log_repo,
    };

    let app = keyhub_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("KeyHub server listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("KeyHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
