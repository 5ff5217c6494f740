use std::sync::Arc;
use crate::domain::{
    models::{auth::Identity, news::News, pagination::{PageRequest, Paginated}},
    ports::NewsRepository,
};
use crate::domain::services::{ensure_admin, fail_on};
use crate::error::{AppError, FieldError};
use chrono::Utc;
use tracing::info;

#[derive(Default)]
pub struct NewsInput {
    pub title: Option<String>,
    pub body: Option<String>,
}

pub struct NewsService {
    repo: Arc<dyn NewsRepository>,
}

impl NewsService {
    pub fn new(repo: Arc<dyn NewsRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_published(&self, page: PageRequest) -> Result<Paginated<News>, AppError> {
        self.repo.list(Some(true), page).await
    }

    /// Drafts are invisible to the public and report as missing.
    pub async fn get_published(&self, id: &str) -> Result<News, AppError> {
        self.repo.find_by_id(id).await?
            .filter(|n| n.published)
            .ok_or(AppError::NotFound("News not found".into()))
    }

    pub async fn list_all(&self, actor: &Identity, page: PageRequest) -> Result<Paginated<News>, AppError> {
        ensure_admin(actor)?;
        self.repo.list(None, page).await
    }

    pub async fn get(&self, actor: &Identity, id: &str) -> Result<News, AppError> {
        ensure_admin(actor)?;
        self.find(id).await
    }

    pub async fn create(&self, actor: &Identity, input: NewsInput) -> Result<News, AppError> {
        ensure_admin(actor)?;

        let title = input.title.unwrap_or_default().trim().to_string();
        let body = input.body.unwrap_or_default().trim().to_string();
        let mut errors = Vec::new();
        if title.is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        }
        if body.is_empty() {
            errors.push(FieldError::new("body", "Body is required"));
        }
        fail_on(errors)?;

        let created = self.repo.create(&News::new(title, body, Some(actor.user_id.clone()))).await?;
        info!("News {} drafted by admin {}", created.id, actor.user_id);
        Ok(created)
    }

    pub async fn update(&self, actor: &Identity, id: &str, input: NewsInput) -> Result<News, AppError> {
        ensure_admin(actor)?;
        let mut news = self.find(id).await?;

        let mut errors = Vec::new();
        if let Some(title) = input.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                errors.push(FieldError::new("title", "Title cannot be empty"));
            }
            news.title = title;
        }
        if let Some(body) = input.body {
            let body = body.trim().to_string();
            if body.is_empty() {
                errors.push(FieldError::new("body", "Body cannot be empty"));
            }
            news.body = body;
        }
        fail_on(errors)?;

        news.updated_at = Utc::now();
        self.repo.update(&news).await
    }

    pub async fn delete(&self, actor: &Identity, id: &str) -> Result<(), AppError> {
        ensure_admin(actor)?;
        self.repo.delete(id).await?;
        info!("News {} deleted by admin {}", id, actor.user_id);
        Ok(())
    }

    pub async fn publish(&self, actor: &Identity, id: &str) -> Result<News, AppError> {
        ensure_admin(actor)?;
        let mut news = self.find(id).await?;
        if news.published {
            return Err(AppError::Conflict("News is already published".into()));
        }

        news.publish();
        let saved = self.repo.update(&news).await?;
        info!("News {} published by admin {}", saved.id, actor.user_id);
        Ok(saved)
    }

    async fn find(&self, id: &str) -> Result<News, AppError> {
        self.repo.find_by_id(id).await?
            .ok_or(AppError::NotFound("News not found".into()))
    }
}
