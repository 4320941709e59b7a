//! The public license verification endpoint.
//!
//! The wire contract is fixed by deployed client software, including the
//! single-character `check` code and the 401/500 body shapes, so this
//! handler builds its responses explicitly instead of going through the
//! generic error mapper. A storage failure must surface as 500 and can
//! never be mistaken for a duplicate or a success.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use keyhub_entity::license::VerificationOutcome;

use crate::dto::request::VerifyRequest;
use crate::dto::response::{VerifyAcceptedResponse, VerifyRejectedResponse};
use crate::extractors::ClientIp;
use crate::state::AppState;

/// POST /api/auth/verify
pub async fn verify(
    State(state): State<AppState>,
    ClientIp(caller_ip): ClientIp,
    Json(req): Json<VerifyRequest>,
) -> Response {
    let result = state
        .activation_engine
        .verify(&req.license_key, &req.client_id, &req.hardware_id, &caller_ip)
        .await;

    match result {
        Ok(outcome @ (VerificationOutcome::Success | VerificationOutcome::Duplicate)) => (
            StatusCode::OK,
            Json(VerifyAcceptedResponse::from_outcome(outcome)),
        )
            .into_response(),
        Ok(VerificationOutcome::Invalid) => (
            StatusCode::UNAUTHORIZED,
            Json(VerifyRejectedResponse::invalid()),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "License verification failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(VerifyRejectedResponse::internal()),
            )
                .into_response()
        }
    }
}
