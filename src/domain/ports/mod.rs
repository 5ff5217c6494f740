use crate::domain::models::{
    auth::RefreshTokenRecord,
    campaign::{Campaign, CampaignFilter, CampaignUpdate},
    charity::{Charity, CharityFilter},
    financial_report::FinancialReport,
    news::News,
    pagination::{PageRequest, Paginated},
    user::{User, UserFilter},
    vote::Vote,
};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

pub const DUPLICATE_CHARITY_MSG: &str = "This account has already registered a charity";
pub const DUPLICATE_LICENSE_MSG: &str = "This license number is already in use";

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    async fn list(&self, filter: &UserFilter) -> Result<Paginated<User>, AppError>;
    async fn count(&self, filter: &UserFilter) -> Result<i64, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
    async fn delete_refresh_tokens_for_user(&self, user_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait CharityRepository: Send + Sync {
    /// Inserts the charity inside one transaction after re-checking that the
    /// owner has no charity yet and that the license number is unused.
    async fn register(&self, charity: &Charity) -> Result<Charity, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Charity>, AppError>;
    async fn find_by_user(&self, user_id: &str) -> Result<Option<Charity>, AppError>;
    async fn find_by_license(&self, license_number: &str, excluding_id: Option<&str>) -> Result<Option<Charity>, AppError>;
    async fn update(&self, charity: &Charity) -> Result<Charity, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list(&self, filter: &CharityFilter) -> Result<Paginated<Charity>, AppError>;
    async fn count(&self, filter: &CharityFilter) -> Result<i64, AppError>;
}

#[async_trait]
pub trait CampaignRepository: Send + Sync {
    async fn create(&self, campaign: &Campaign) -> Result<Campaign, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Campaign>, AppError>;
    async fn update(&self, campaign: &Campaign) -> Result<Campaign, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list(&self, filter: &CampaignFilter) -> Result<Paginated<Campaign>, AppError>;
    async fn count(&self, filter: &CampaignFilter) -> Result<i64, AppError>;
    async fn count_by_charity(&self, charity_id: &str) -> Result<i64, AppError>;
    async fn total_raised(&self) -> Result<f64, AppError>;
    async fn add_update(&self, update: &CampaignUpdate) -> Result<CampaignUpdate, AppError>;
    async fn list_updates(&self, campaign_id: &str) -> Result<Vec<CampaignUpdate>, AppError>;
}

#[async_trait]
pub trait FinancialReportRepository: Send + Sync {
    async fn create(&self, report: &FinancialReport) -> Result<FinancialReport, AppError>;
    async fn list_by_charity(&self, charity_id: &str) -> Result<Vec<FinancialReport>, AppError>;
}

#[async_trait]
pub trait VoteRepository: Send + Sync {
    async fn create(&self, vote: &Vote) -> Result<Vote, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Vote>, AppError>;
    async fn list(&self, page: PageRequest) -> Result<Paginated<Vote>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait NewsRepository: Send + Sync {
    async fn create(&self, news: &News) -> Result<News, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<News>, AppError>;
    async fn update(&self, news: &News) -> Result<News, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list(&self, published: Option<bool>, page: PageRequest) -> Result<Paginated<News>, AppError>;
    async fn count(&self, published: Option<bool>) -> Result<i64, AppError>;
}
