use crate::domain::{models::financial_report::FinancialReport, ports::FinancialReportRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresFinancialReportRepo {
    pool: PgPool,
}

impl PostgresFinancialReportRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FinancialReportRepository for PostgresFinancialReportRepo {
    async fn create(&self, report: &FinancialReport) -> Result<FinancialReport, AppError> {
        sqlx::query_as::<_, FinancialReport>(
            "INSERT INTO financial_reports (id, charity_id, period, total_income, total_expense, description, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)
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
             FROM financial_reports WHERE charity_id = $1 ORDER BY period DESC, created_at DESC"
        )
            .bind(charity_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
