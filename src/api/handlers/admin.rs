use axum::{extract::{Path, State}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{
    requests::{
        CampaignQuery, CharityQuery, NewsRequest, PageQuery, RejectCampaignRequest, UserQuery,
        VerifyCharityRequest,
    },
    responses::{message, paginated},
};
use crate::api::validation::{ApiQuery, ValidJson};
use std::sync::Arc;

pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.admin_service.dashboard_stats(&actor).await?))
}

// --- Charities ---

pub async fn list_charities(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    ApiQuery(query): ApiQuery<CharityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.admin_service.list_charities(&actor, query.into_filter()?).await?;
    paginated("charities", page)
}

pub async fn pending_charities(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.admin_service.pending_charities(&actor, query.into_page()?).await?;
    paginated("charities", page)
}

pub async fn get_charity(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.admin_service.charity_detail(&actor, &id).await?))
}

pub async fn verify_charity(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<VerifyCharityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let decision = payload.decision()?;
    Ok(Json(state.admin_service.verify_charity(&actor, &id, decision, payload.reason).await?))
}

// --- Campaigns ---

pub async fn list_campaigns(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    ApiQuery(query): ApiQuery<CampaignQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.admin_service.list_campaigns(&actor, query.into_filter()?).await?;
    paginated("campaigns", page)
}

pub async fn pending_campaigns(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.admin_service.pending_campaigns(&actor, query.into_page()?).await?;
    paginated("campaigns", page)
}

pub async fn approve_campaign(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.admin_service.approve_campaign(&actor, &id).await?))
}

pub async fn reject_campaign(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<RejectCampaignRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.admin_service.reject_campaign(&actor, &id, payload.reason).await?))
}

// --- Users ---

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.admin_service.list_users(&actor, query.into_filter()?).await?;
    paginated("users", page)
}

pub async fn approve_dao(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.admin_service.approve_dao(&actor, &id).await?))
}

pub async fn reject_dao(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.admin_service.reject_dao(&actor, &id).await?))
}

pub async fn ban_user(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.admin_service.ban_user(&actor, &id).await?))
}

pub async fn unban_user(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.admin_service.unban_user(&actor, &id).await?))
}

// --- Votes ---

pub async fn list_votes(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.admin_service.list_votes(&actor, query.into_page()?).await?;
    paginated("votes", page)
}

pub async fn delete_vote(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.admin_service.delete_vote(&actor, &id).await?;
    Ok(message("Vote deleted"))
}

// --- News ---

pub async fn list_news(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.news_service.list_all(&actor, query.into_page()?).await?;
    paginated("news", page)
}

pub async fn create_news(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    ValidJson(payload): ValidJson<NewsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let news = state.news_service.create(&actor, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(news)))
}

pub async fn get_news(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.news_service.get(&actor, &id).await?))
}

pub async fn update_news(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<NewsRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.news_service.update(&actor, &id, payload.into()).await?))
}

pub async fn delete_news(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.news_service.delete(&actor, &id).await?;
    Ok(message("News deleted"))
}

pub async fn publish_news(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.news_service.publish(&actor, &id).await?))
}
