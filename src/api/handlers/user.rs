use axum::{extract::{Multipart, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{
    requests::{ChangePasswordRequest, UpdateProfileRequest},
    responses::message,
};
use crate::api::validation::ValidJson;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

pub const AVATAR_FIELD: &str = "avatar";

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.user_service.profile(&actor).await?))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    ValidJson(payload): ValidJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.user_service.update_profile(&actor, payload.into()).await?))
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    ValidJson(payload): ValidJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.user_service
        .change_password(&actor, &payload.current_password, &payload.new_password)
        .await?;
    Ok(message("Password changed"))
}

pub async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Rejected avatar upload from {}: {}", actor.user_id, e);
        AppError::Validation(e.body_text())
    })? {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            warn!("Failed to read avatar from {}: {}", actor.user_id, e);
            AppError::Validation(e.body_text())
        })?;

        let user = state.user_service.upload_avatar(&actor, &content_type, &data).await?;
        return Ok(Json(json!({
            "message": "Avatar uploaded",
            "avatar_url": user.avatar_url,
        })));
    }

    Err(AppError::Validation("No avatar file provided".into()))
}

pub async fn deactivate(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    state.user_service.deactivate(&actor).await?;
    Ok(message("Account deactivated"))
}

pub async fn apply_dao(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.apply_dao(&actor).await?;
    Ok(Json(json!({
        "message": "DAO application submitted",
        "dao_status": user.dao_status,
    })))
}
