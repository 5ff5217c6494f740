use serde::Serialize;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct FinancialReport {
    pub id: String,
    pub charity_id: String,
    pub period: String,
    pub total_income: f64,
    pub total_expense: f64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FinancialReport {
    pub fn new(charity_id: String, period: String, total_income: f64, total_expense: f64, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            charity_id,
            period,
            total_income,
            total_expense,
            description,
            created_at: Utc::now(),
        }
    }
}
