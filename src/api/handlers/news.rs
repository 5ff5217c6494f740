use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::PageQuery, responses::paginated};
use crate::api::validation::ApiQuery;
use std::sync::Arc;

pub async fn list_news(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.news_service.list_published(query.into_page()?).await?;
    paginated("news", page)
}

pub async fn get_news(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.news_service.get_published(&id).await?))
}
