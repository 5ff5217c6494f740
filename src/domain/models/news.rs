use serde::Serialize;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct News {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author_id: Option<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl News {
    pub fn new(title: String, body: String, author_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            body,
            author_id,
            published: false,
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn publish(&mut self) {
        let now = Utc::now();
        self.published = true;
        self.published_at.get_or_insert(now);
        self.updated_at = now;
    }
}
