use axum::Json;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::domain::models::pagination::Paginated;
use crate::error::AppError;

/// `{<key>: [...], total, page, limit, totalPages}`
pub fn paginated<T: Serialize>(key: &str, page: Paginated<T>) -> Result<Json<Value>, AppError> {
    let total_pages = page.total_pages();
    let items = serde_json::to_value(&page.items)
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to serialize {}: {}", key, e)))?;

    let mut body = Map::new();
    body.insert(key.to_string(), items);
    body.insert("total".into(), json!(page.total));
    body.insert("page".into(), json!(page.page));
    body.insert("limit".into(), json!(page.limit));
    body.insert("totalPages".into(), json!(total_pages));
    Ok(Json(Value::Object(body)))
}

pub fn message(msg: &str) -> Json<Value> {
    Json(json!({ "message": msg }))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
