use crate::domain::{models::financial_report::FinancialReport, ports::FinancialReportRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteFinancialReportRepo {
    pool: SqlitePool,
}

impl SqliteFinancialReportRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FinancialReportRepository for SqliteFinancialReportRepo {
    async fn create(&self, report: &FinancialReport) -> Result<FinancialReport, AppError> {
        sqlx::query_as::<_, FinancialReport>(
            "INSERT INTO financial_reports (id, charity_id, period, total_income, total_expense, description, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING id, charity_id, period, total_income, total_expense, description, created_at"
        )
            .bind(&report.id)
            .bind(&report.charity_id)
            .bind(&report.period)
            .bind(report.total_income)
            .bind(report.total_expense)
            .bind(&report.description)
            .bind(report.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_charity(&self, charity_id: &str) -> Result<Vec<FinancialReport>, AppError> {
        sqlx::query_as::<_, FinancialReport>(
            "SELECT id, charity_id, period, total_income, total_expense, description, created_at
             FROM financial_reports WHERE charity_id = ? ORDER BY period DESC, created_at DESC"
        )
            .bind(charity_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
