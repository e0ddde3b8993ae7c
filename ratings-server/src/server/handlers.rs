// HTTP request handlers
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use ratings_shared::types::{Aggregate, Ratings, VoteRequest};
use tracing::{error, info};

use crate::errors::ServerError;
use crate::server::state::AppState;

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Ratings server is running")
}

/// Returns every aggregate known to the ledger.
pub async fn ratings_handler(State(state): State<AppState>) -> Result<Json<Ratings>, ServerError> {
    let ratings = state.ledger.fetch_all().await.map_err(|e| {
        error!(error = %e, "Failed to fetch ratings");
        e
    })?;

    Ok(Json(ratings))
}

/// Applies a vote and returns the effect's updated aggregate.
pub async fn votes_handler(
    State(state): State<AppState>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<Aggregate>, ServerError> {
    if request.effect_id.trim().is_empty() {
        return Err(ServerError::InvalidRequest("effectId must not be empty".to_string()));
    }

    // Nets to zero; skipping it is the client's job.
    if request.previous_choice == Some(request.new_choice) {
        info!(effect_id = %request.effect_id, "Received vote identical to previous choice");
    }

    let aggregate = state
        .ledger
        .submit_vote(&request.effect_id, request.new_choice, request.previous_choice)
        .await
        .map_err(|e| {
            error!(error = %e, effect_id = %request.effect_id, "Failed to apply vote");
            e
        })?;

    Ok(Json(aggregate))
}
