use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{
    requests::{LoginRequest, RefreshTokenRequest, RegisterRequest},
    responses::message,
};
use crate::api::validation::ValidJson;
use crate::domain::models::auth::{AuthResponse, RefreshResponse, UserProfile};
use crate::domain::services::auth_service::RegisterInput;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role = payload.role();
    let user = state.auth_service.register(RegisterInput {
        full_name: payload.full_name,
        email: payload.email,
        phone: payload.phone,
        password: payload.password,
        role,
    }).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration successful",
            "user": UserProfile::from(&user),
        })),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (user, tokens) = state.auth_service.login(&payload.email, &payload.password).await?;

    info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        user: UserProfile::from(&user),
    }))
}

pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tokens = state.auth_service.refresh(&payload.refresh_token).await?;

    Ok(Json(RefreshResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.logout(&payload.refresh_token).await?;

    info!("User logged out");

    Ok(message("Logged out"))
}
