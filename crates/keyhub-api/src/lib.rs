//! # keyhub-api
//!
//! HTTP API layer for KeyHub built on Axum.
//!
//! Provides the public verification endpoint, the authenticated admin
//! surface, middleware, extractors, DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
