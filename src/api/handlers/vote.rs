use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::VoteRequest;
use crate::api::validation::ValidJson;
use std::sync::Arc;

pub async fn cast_vote(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    ValidJson(payload): ValidJson<VoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let decision = payload.decision()?;
    let vote = state.vote_service.cast(&actor, payload.target_id.trim(), decision).await?;
    Ok((StatusCode::CREATED, Json(vote)))
}
