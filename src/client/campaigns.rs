use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::api_client::ApiClient;
use super::error::ClientError;
use crate::domain::models::campaign::CampaignStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct CampaignView {
    pub id: String,
    pub charity_id: String,
    pub title: String,
    pub description: Option<String>,
    pub goal_amount: f64,
    pub current_amount: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub featured: bool,
    pub status: CampaignStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CampaignDetailView {
    #[serde(flatten)]
    pub campaign: CampaignView,
    pub charity: Option<Value>,
    #[serde(default)]
    pub progress_updates: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CampaignPage {
    pub campaigns: Vec<CampaignView>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default)]
pub struct CampaignListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<CampaignStatus>,
    pub charity_id: Option<String>,
    pub featured: Option<bool>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl CampaignListParams {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(v) = value {
                query.push((key, v));
            }
        };

        push("page", self.page.map(|p| p.to_string()));
        push("limit", self.limit.map(|l| l.to_string()));
        push("search", self.search.clone());
        push("category", self.category.clone());
        push("status", self.status.map(|s| s.to_string()));
        push("charity_id", self.charity_id.clone());
        push("featured", self.featured.map(|f| f.to_string()));
        push("sort", self.sort.clone());
        push("order", self.order.clone());
        query
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCampaign {
    pub charity_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub goal_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CampaignChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

pub struct CampaignsApi {
    client: Arc<ApiClient>,
}

impl CampaignsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: &CampaignListParams) -> Result<CampaignPage, ClientError> {
        self.client.get_with_query("/api/campaigns", &params.to_query()).await
    }

    pub async fn featured(&self, limit: Option<u32>) -> Result<CampaignPage, ClientError> {
        let query: Vec<_> = limit.map(|l| ("limit", l.to_string())).into_iter().collect();
        self.client.get_with_query("/api/campaigns/featured", &query).await
    }

    pub async fn categories(&self) -> Result<Vec<CategoryView>, ClientError> {
        self.client.get("/api/campaigns/categories").await
    }

    pub async fn get(&self, id: &str) -> Result<CampaignDetailView, ClientError> {
        self.client.get(&format!("/api/campaigns/{}", id)).await
    }

    pub async fn create(&self, campaign: &NewCampaign) -> Result<CampaignView, ClientError> {
        self.client.post("/api/campaigns", campaign).await
    }

    pub async fn update(&self, id: &str, changes: &CampaignChanges) -> Result<CampaignView, ClientError> {
        self.client.put(&format!("/api/campaigns/{}", id), changes).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.client.delete::<Value>(&format!("/api/campaigns/{}", id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_skip_unset_fields() {
        let params = CampaignListParams {
            page: Some(2),
            category: Some("education".into()),
            status: Some(CampaignStatus::Completed),
            featured: Some(true),
            ..Default::default()
        };

        assert_eq!(
            params.to_query(),
            vec![
                ("page", "2".to_string()),
                ("category", "education".to_string()),
                ("status", "completed".to_string()),
                ("featured", "true".to_string()),
            ]
        );
        assert!(CampaignListParams::default().to_query().is_empty());
    }
}
