use serde::Serialize;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::{charity::CharitySummary, pagination::{PageRequest, SortOrder}};

string_enum!(CampaignStatus {
    Pending => "pending",
    Active => "active",
    Rejected => "rejected",
    Completed => "completed",
});

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct Campaign {
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
    #[sqlx(try_from = "String")]
    pub status: CampaignStatus,
    pub rejection_reason: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewCampaignParams {
    pub charity_id: String,
    pub title: String,
    pub description: Option<String>,
    pub goal_amount: f64,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl Campaign {
    pub fn new(params: NewCampaignParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            charity_id: params.charity_id,
            title: params.title,
            description: params.description,
            goal_amount: params.goal_amount,
            current_amount: 0.0,
            start_date: params.start_date.unwrap_or(now),
            end_date: params.end_date,
            category: params.category,
            image_url: params.image_url,
            featured: false,
            status: CampaignStatus::Pending,
            rejection_reason: None,
            approved_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct CampaignUpdate {
    pub id: String,
    pub campaign_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl CampaignUpdate {
    pub fn new(campaign_id: String, title: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            campaign_id,
            title,
            content,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CampaignDetail {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub charity: Option<CharitySummary>,
    pub progress_updates: Vec<CampaignUpdate>,
}

#[derive(Debug, Serialize, Clone, Copy)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
}

pub const CATEGORIES: &[Category] = &[
    Category { id: "education", name: "Education", icon: "🎓" },
    Category { id: "health", name: "Health", icon: "🏥" },
    Category { id: "environment", name: "Environment", icon: "🌱" },
    Category { id: "poverty", name: "Poverty relief", icon: "🍚" },
    Category { id: "disaster", name: "Disaster relief", icon: "🆘" },
    Category { id: "children", name: "Children", icon: "👶" },
    Category { id: "elderly", name: "Elderly", icon: "👴" },
    Category { id: "disability", name: "Disability", icon: "♿" },
    Category { id: "animals", name: "Animal protection", icon: "🐕" },
    Category { id: "community", name: "Community", icon: "🏘️" },
];

string_enum!(CampaignSortField {
    CreatedAt => "created_at",
    GoalAmount => "goal_amount",
    CurrentAmount => "current_amount",
    EndDate => "end_date",
});

/// Every filter the campaign listing understands. Anything else in the
/// query string is ignored; malformed values are rejected while parsing.
#[derive(Debug, Clone)]
pub struct CampaignFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<CampaignStatus>,
    pub charity_id: Option<String>,
    pub featured: Option<bool>,
    /// Restrict to campaigns whose charity is verified (public listings).
    pub verified_charities_only: bool,
    pub sort: CampaignSortField,
    pub order: SortOrder,
    pub page: PageRequest,
}

impl Default for CampaignFilter {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            status: None,
            charity_id: None,
            featured: None,
            verified_charities_only: false,
            sort: CampaignSortField::CreatedAt,
            order: SortOrder::Desc,
            page: PageRequest::default(),
        }
    }
}
