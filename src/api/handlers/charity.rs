use axum::{extract::{Path, State}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{
    requests::{CharityQuery, CharityRequest, FinancialReportRequest},
    responses::{message, paginated},
};
use crate::api::validation::{ApiQuery, ValidJson};
use serde_json::json;
use std::sync::Arc;

pub async fn list_charities(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<CharityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.charity_service.list_public(query.into_filter()?).await?;
    paginated("charities", page)
}

pub async fn get_charity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.charity_service.get_public(&id).await?))
}

pub async fn financial_reports(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reports = state.charity_service.financial_reports(&id).await?;
    Ok(Json(json!({ "financial_reports": reports })))
}

pub async fn register_charity(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    ValidJson(payload): ValidJson<CharityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let charity = state.charity_service.register(&actor, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(charity)))
}

pub async fn my_charity(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.charity_service.my_charity(&actor).await?))
}

pub async fn update_my_charity(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    ValidJson(payload): ValidJson<CharityRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.charity_service.update_mine(&actor, payload.into()).await?))
}

pub async fn add_financial_report(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    ValidJson(payload): ValidJson<FinancialReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let report = state.charity_service.add_financial_report(&actor, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn update_charity(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<CharityRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.charity_service.update(&actor, &id, payload.into()).await?))
}

pub async fn delete_charity(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.charity_service.delete(&actor, &id).await?;
    Ok(message("Charity deleted"))
}
