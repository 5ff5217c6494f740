use crate::domain::{
    models::{pagination::{PageRequest, Paginated}, vote::Vote},
    ports::VoteRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresVoteRepo { pool: PgPool }
impl PostgresVoteRepo { pub fn new(pool: PgPool) -> Self { Self { pool } } }

#[async_trait]
impl VoteRepository for PostgresVoteRepo {
    async fn create(&self, vote: &Vote) -> Result<Vote, AppError> {
        sqlx::query_as::<_, Vote>(
            "INSERT INTO votes (id, user_id, target_id, decision, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING id, user_id, target_id, decision, created_at"
        )
            .bind(&vote.id)
            .bind(&vote.user_id)
            .bind(&vote.target_id)
            .bind(vote.decision.as_str())
            .bind(vote.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Vote>, AppError> {
        sqlx::query_as::<_, Vote>("SELECT id, user_id, target_id, decision, created_at FROM votes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, page: PageRequest) -> Result<Paginated<Vote>, AppError> {
        let total = self.count().await?;
        let votes = sqlx::query_as::<_, Vote>(
            "SELECT id, user_id, target_id, decision, created_at FROM votes ORDER BY created_at DESC, id ASC LIMIT $1 OFFSET $2"
        )
            .bind(page.limit as i64)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(Paginated::new(votes, total, page))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM votes WHERE id = $1")
            .bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vote not found".into()));
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM votes")
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
