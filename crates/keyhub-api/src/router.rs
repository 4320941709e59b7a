//! Route definitions for the KeyHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(license_routes())
        .merge(program_routes())
        .merge(dashboard_routes())
        .merge(log_routes())
        .merge(user_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Verification (public) + admin login endpoints
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/verify", post(handlers::verify::verify))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/me", get(handlers::auth::me))
}

/// License inventory management
fn license_routes() -> Router<AppState> {
    Router::new()
        .route("/licenses", get(handlers::license::list_licenses))
        .route("/licenses", post(handlers::license::bulk_generate))
        .route("/licenses", delete(handlers::license::bulk_delete))
        .route("/licenses/single", post(handlers::license::create_single))
        .route("/licenses/export", get(handlers::license::export_licenses))
        .route("/licenses/import", post(handlers::license::import_licenses))
        .route(
            "/licenses/bulk-import",
            post(handlers::license::bulk_import_licenses),
        )
        .route("/licenses/programs", get(handlers::license::list_programs))
        .route("/licenses/{id}", get(handlers::license::get_license))
        .route("/licenses/{id}", delete(handlers::license::delete_license))
        .route("/licenses/{id}/stop", post(handlers::license::stop_license))
        .route(
            "/licenses/{id}/active",
            patch(handlers::license::toggle_active),
        )
        .route(
            "/licenses/{id}/username",
            patch(handlers::license::update_user_name),
        )
}

/// Running-clients view
fn program_routes() -> Router<AppState> {
    Router::new().route(
        "/programs/active-clients",
        get(handlers::program::active_clients),
    )
}

/// Dashboard statistics
fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard/stats", get(handlers::dashboard::stats))
}

/// Auth log viewer
fn log_routes() -> Router<AppState> {
    Router::new().route("/logs", get(handlers::log::list_logs))
}

/// Admin account management
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list_admins))
        .route("/users", post(handlers::user::create_admin))
        .route("/users/{id}", put(handlers::user::update_admin))
        .route("/users/{id}", delete(handlers::user::delete_admin))
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::{HeaderValue, Method};
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(cors_config.max_age_seconds));

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    cors
}
