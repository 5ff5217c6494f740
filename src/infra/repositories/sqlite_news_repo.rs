use crate::domain::{
    models::{news::News, pagination::{PageRequest, Paginated}},
    ports::NewsRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

const NEWS_COLUMNS: &str = "id, title, body, author_id, published, published_at, created_at, updated_at";

pub struct SqliteNewsRepo {
    pool: SqlitePool,
}

impl SqliteNewsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NewsRepository for SqliteNewsRepo {
    async fn create(&self, news: &News) -> Result<News, AppError> {
        sqlx::query_as::<_, News>(&format!(
            "INSERT INTO news ({NEWS_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {NEWS_COLUMNS}"
        ))
            .bind(&news.id)
            .bind(&news.title)
            .bind(&news.body)
            .bind(&news.author_id)
            .bind(news.published)
            .bind(news.published_at)
            .bind(news.created_at)
            .bind(news.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<News>, AppError> {
        sqlx::query_as::<_, News>(&format!("SELECT {NEWS_COLUMNS} FROM news WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, news: &News) -> Result<News, AppError> {
        sqlx::query_as::<_, News>(&format!(
            "UPDATE news SET title = ?, body = ?, published = ?, published_at = ?, updated_at = ? WHERE id = ? RETURNING {NEWS_COLUMNS}"
        ))
            .bind(&news.title)
            .bind(&news.body)
            .bind(news.published)
            .bind(news.published_at)
            .bind(news.updated_at)
            .bind(&news.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("News not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM news WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("News not found".into()));
        }
        Ok(())
    }

    async fn list(&self, published: Option<bool>, page: PageRequest) -> Result<Paginated<News>, AppError> {
        let total = self.count(published).await?;
        let items = sqlx::query_as::<_, News>(&format!(
            "SELECT {NEWS_COLUMNS} FROM news WHERE (? IS NULL OR published = ?) ORDER BY created_at DESC, id ASC LIMIT ? OFFSET ?"
        ))
            .bind(published)
            .bind(published)
            .bind(page.limit as i64)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(Paginated::new(items, total, page))
    }

    async fn count(&self, published: Option<bool>) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM news WHERE (? IS NULL OR published = ?)")
            .bind(published)
            .bind(published)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
