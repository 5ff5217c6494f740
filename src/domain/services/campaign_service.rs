use std::sync::Arc;
use crate::domain::{
    models::{
        auth::Identity,
        campaign::{
            Campaign, CampaignDetail, CampaignFilter, CampaignStatus, CampaignUpdate,
            Category, NewCampaignParams, CATEGORIES,
        },
        charity::CharitySummary,
        pagination::{PageRequest, Paginated, SortOrder},
    },
    ports::{CampaignRepository, CharityRepository},
};
use crate::domain::services::{ensure_manages, fail_on, non_blank};
use crate::error::{AppError, FieldError};
use chrono::{DateTime, Utc};
use tracing::info;

pub const DEFAULT_FEATURED_LIMIT: u32 = 6;

pub struct CreateCampaignInput {
    pub charity_id: String,
    pub title: String,
    pub description: Option<String>,
    pub goal_amount: f64,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Default)]
pub struct UpdateCampaignInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal_amount: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub featured: Option<bool>,
}

pub struct CampaignService {
    campaigns: Arc<dyn CampaignRepository>,
    charities: Arc<dyn CharityRepository>,
}

fn check_category(category: &Option<String>, errors: &mut Vec<FieldError>) {
    if let Some(category) = category {
        if !CATEGORIES.iter().any(|c| c.id == category) {
            errors.push(FieldError::new("category", format!("Unknown category '{}'", category)));
        }
    }
}

fn check_goal(goal_amount: f64, errors: &mut Vec<FieldError>) {
    if !goal_amount.is_finite() || goal_amount < 0.0 {
        errors.push(FieldError::new("goal_amount", "Goal amount must be a number greater than or equal to 0"));
    }
}

fn check_dates(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>, errors: &mut Vec<FieldError>) {
    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            errors.push(FieldError::new("end_date", "End date must be after start date"));
        }
    }
}

impl CampaignService {
    pub fn new(campaigns: Arc<dyn CampaignRepository>, charities: Arc<dyn CharityRepository>) -> Self {
        Self { campaigns, charities }
    }

    /// Public listing: only campaigns of verified charities, active ones
    /// unless a status was asked for explicitly.
    pub async fn list(&self, mut filter: CampaignFilter) -> Result<Paginated<Campaign>, AppError> {
        filter.status.get_or_insert(CampaignStatus::Active);
        filter.verified_charities_only = true;
        self.campaigns.list(&filter).await
    }

    pub async fn featured(&self, limit: Option<u32>) -> Result<Paginated<Campaign>, AppError> {
        let filter = CampaignFilter {
            featured: Some(true),
            status: Some(CampaignStatus::Active),
            verified_charities_only: true,
            order: SortOrder::Desc,
            page: PageRequest::new(1, limit.unwrap_or(DEFAULT_FEATURED_LIMIT)),
            ..CampaignFilter::default()
        };
        self.campaigns.list(&filter).await
    }

    pub fn categories(&self) -> &'static [Category] {
        CATEGORIES
    }

    pub async fn get(&self, id: &str) -> Result<CampaignDetail, AppError> {
        let campaign = self.find(id).await?;
        let charity = self.charities.find_by_id(&campaign.charity_id).await?
            .map(|c| CharitySummary::from(&c));
        let progress_updates = self.campaigns.list_updates(&campaign.id).await?;

        Ok(CampaignDetail { campaign, charity, progress_updates })
    }

    pub async fn create(&self, actor: &Identity, input: CreateCampaignInput) -> Result<Campaign, AppError> {
        let mut errors = Vec::new();
        let title = input.title.trim().to_string();
        if input.charity_id.trim().is_empty() {
            errors.push(FieldError::new("charity_id", "Charity is required"));
        }
        if title.is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        }
        check_goal(input.goal_amount, &mut errors);
        check_category(&input.category, &mut errors);
        check_dates(input.start_date, input.end_date, &mut errors);
        fail_on(errors)?;

        let charity = self.charities.find_by_id(&input.charity_id).await?
            .ok_or(AppError::NotFound("Charity not found".into()))?;
        ensure_manages(actor, &charity)?;

        let campaign = Campaign::new(NewCampaignParams {
            charity_id: charity.id,
            title,
            description: non_blank(input.description),
            goal_amount: input.goal_amount,
            start_date: input.start_date,
            end_date: input.end_date,
            category: input.category,
            image_url: non_blank(input.image_url),
        });

        let created = self.campaigns.create(&campaign).await?;
        info!("Campaign {} created for charity {} by {}", created.id, created.charity_id, actor.user_id);
        Ok(created)
    }

    pub async fn update(&self, actor: &Identity, id: &str, input: UpdateCampaignInput) -> Result<Campaign, AppError> {
        let mut campaign = self.find(id).await?;
        self.ensure_owner(actor, &campaign).await?;

        if input.featured.is_some() && !actor.is_admin() {
            return Err(AppError::Forbidden("Only administrators can feature campaigns".into()));
        }

        let mut errors = Vec::new();
        if let Some(title) = &input.title {
            if title.trim().is_empty() {
                errors.push(FieldError::new("title", "Title cannot be empty"));
            }
        }
        if let Some(goal) = input.goal_amount {
            check_goal(goal, &mut errors);
        }
        check_category(&input.category, &mut errors);
        check_dates(
            Some(input.start_date.unwrap_or(campaign.start_date)),
            input.end_date.or(campaign.end_date),
            &mut errors,
        );
        fail_on(errors)?;

        if let Some(val) = input.title { campaign.title = val.trim().to_string(); }
        if let Some(val) = input.description { campaign.description = non_blank(Some(val)); }
        if let Some(val) = input.goal_amount { campaign.goal_amount = val; }
        if let Some(val) = input.start_date { campaign.start_date = val; }
        if let Some(val) = input.end_date { campaign.end_date = Some(val); }
        if let Some(val) = input.category { campaign.category = Some(val); }
        if let Some(val) = input.image_url { campaign.image_url = non_blank(Some(val)); }
        if let Some(val) = input.featured { campaign.featured = val; }
        campaign.updated_at = Utc::now();

        self.campaigns.update(&campaign).await
    }

    pub async fn delete(&self, actor: &Identity, id: &str) -> Result<(), AppError> {
        let campaign = self.find(id).await?;
        self.ensure_owner(actor, &campaign).await?;

        self.campaigns.delete(&campaign.id).await?;
        info!("Campaign {} deleted by {}", campaign.id, actor.user_id);
        Ok(())
    }

    pub async fn add_update(&self, actor: &Identity, id: &str, title: String, content: String) -> Result<CampaignUpdate, AppError> {
        let campaign = self.find(id).await?;
        self.ensure_owner(actor, &campaign).await?;

        let mut errors = Vec::new();
        if title.trim().is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        }
        if content.trim().is_empty() {
            errors.push(FieldError::new("content", "Content is required"));
        }
        fail_on(errors)?;

        let update = CampaignUpdate::new(campaign.id, title.trim().to_string(), content.trim().to_string());
        self.campaigns.add_update(&update).await
    }

    async fn find(&self, id: &str) -> Result<Campaign, AppError> {
        self.campaigns.find_by_id(id).await?
            .ok_or(AppError::NotFound("Campaign not found".into()))
    }

    async fn ensure_owner(&self, actor: &Identity, campaign: &Campaign) -> Result<(), AppError> {
        if actor.is_admin() {
            return Ok(());
        }
        match self.charities.find_by_id(&campaign.charity_id).await? {
            Some(charity) => ensure_manages(actor, &charity),
            None => Err(AppError::Forbidden("You do not manage this campaign".into())),
        }
    }
}
