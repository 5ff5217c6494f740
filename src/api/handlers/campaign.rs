use axum::{extract::{Path, State}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{
    requests::{CampaignQuery, CampaignUpdateRequest, CreateCampaignRequest, FeaturedQuery, UpdateCampaignRequest},
    responses::{message, paginated},
};
use crate::api::validation::{ApiQuery, ValidJson};
use std::sync::Arc;

pub async fn list_campaigns(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<CampaignQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.campaign_service.list(query.into_filter()?).await?;
    paginated("campaigns", page)
}

pub async fn featured_campaigns(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<FeaturedQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.campaign_service.featured(query.into_limit()?).await?;
    paginated("campaigns", page)
}

pub async fn categories(
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    Json(state.campaign_service.categories())
}

pub async fn get_campaign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.campaign_service.get(&id).await?))
}

pub async fn create_campaign(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    ValidJson(payload): ValidJson<CreateCampaignRequest>,
) -> Result<impl IntoResponse, AppError> {
    let campaign = state.campaign_service.create(&actor, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

pub async fn update_campaign(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<UpdateCampaignRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.campaign_service.update(&actor, &id, payload.into()).await?))
}

pub async fn delete_campaign(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.campaign_service.delete(&actor, &id).await?;
    Ok(message("Campaign deleted"))
}

pub async fn add_progress_update(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<CampaignUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let update = state.campaign_service.add_update(&actor, &id, payload.title, payload.content).await?;
    Ok((StatusCode::CREATED, Json(update)))
}
