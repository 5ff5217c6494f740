use std::sync::Arc;
use crate::domain::{
    models::{
        auth::Identity,
        campaign::{Campaign, CampaignFilter, CampaignStatus},
        charity::{Charity, CharityDetail, CharityFilter, VerificationStatus},
        pagination::{PageRequest, Paginated},
        stats::{CampaignStats, CharityStats, DashboardStats, NewsStats, UserStats},
        user::{DaoStatus, User, UserFilter, UserRole, UserStatus},
        vote::Vote,
    },
    ports::{
        AuthRepository, CampaignRepository, CharityRepository, NewsRepository, UserRepository,
        VoteRepository,
    },
};
use crate::domain::services::{charity_service::CharityService, ensure_admin, non_blank};
use crate::error::AppError;
use chrono::Utc;
use tracing::{info, warn};

pub struct AdminService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn AuthRepository>,
    charities: Arc<dyn CharityRepository>,
    campaigns: Arc<dyn CampaignRepository>,
    votes: Arc<dyn VoteRepository>,
    news: Arc<dyn NewsRepository>,
    charity_service: Arc<CharityService>,
}

impl AdminService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn AuthRepository>,
        charities: Arc<dyn CharityRepository>,
        campaigns: Arc<dyn CampaignRepository>,
        votes: Arc<dyn VoteRepository>,
        news: Arc<dyn NewsRepository>,
        charity_service: Arc<CharityService>,
    ) -> Self {
        Self { users, tokens, charities, campaigns, votes, news, charity_service }
    }

    pub async fn dashboard_stats(&self, actor: &Identity) -> Result<DashboardStats, AppError> {
        ensure_admin(actor)?;

        let user_count = |filter: UserFilter| {
            let users = self.users.clone();
            async move { users.count(&filter).await }
        };
        let users = UserStats {
            total: user_count(UserFilter::default()).await?,
            donors: user_count(UserFilter { role: Some(UserRole::Donor), ..Default::default() }).await?,
            charities: user_count(UserFilter { role: Some(UserRole::Charity), ..Default::default() }).await?,
            admins: user_count(UserFilter { role: Some(UserRole::Admin), ..Default::default() }).await?,
            banned: user_count(UserFilter { status: Some(UserStatus::Banned), ..Default::default() }).await?,
            dao_members: user_count(UserFilter { dao_status: Some(DaoStatus::Approved), ..Default::default() }).await?,
            dao_pending: user_count(UserFilter { dao_status: Some(DaoStatus::Pending), ..Default::default() }).await?,
        };

        let charity_count = |status: Option<VerificationStatus>| {
            let charities = self.charities.clone();
            async move {
                charities.count(&CharityFilter { verification_status: status, ..Default::default() }).await
            }
        };
        let charities = CharityStats {
            total: charity_count(None).await?,
            pending: charity_count(Some(VerificationStatus::Pending)).await?,
            verified: charity_count(Some(VerificationStatus::Verified)).await?,
            rejected: charity_count(Some(VerificationStatus::Rejected)).await?,
        };

        let campaign_count = |status: Option<CampaignStatus>| {
            let campaigns = self.campaigns.clone();
            async move {
                campaigns.count(&CampaignFilter { status, ..Default::default() }).await
            }
        };
        let campaigns = CampaignStats {
            total: campaign_count(None).await?,
            pending: campaign_count(Some(CampaignStatus::Pending)).await?,
            active: campaign_count(Some(CampaignStatus::Active)).await?,
            rejected: campaign_count(Some(CampaignStatus::Rejected)).await?,
            completed: campaign_count(Some(CampaignStatus::Completed)).await?,
            total_raised: self.campaigns.total_raised().await?,
        };

        let news = NewsStats {
            total: self.news.count(None).await?,
            published: self.news.count(Some(true)).await?,
        };

        Ok(DashboardStats {
            users,
            charities,
            campaigns,
            votes: self.votes.count().await?,
            news,
        })
    }

    // --- Charities ---

    pub async fn list_charities(&self, actor: &Identity, filter: CharityFilter) -> Result<Paginated<Charity>, AppError> {
        ensure_admin(actor)?;
        self.charities.list(&filter).await
    }

    pub async fn pending_charities(&self, actor: &Identity, page: PageRequest) -> Result<Paginated<Charity>, AppError> {
        let filter = CharityFilter {
            verification_status: Some(VerificationStatus::Pending),
            page,
            ..Default::default()
        };
        self.list_charities(actor, filter).await
    }

    pub async fn charity_detail(&self, actor: &Identity, id: &str) -> Result<CharityDetail<Charity>, AppError> {
        ensure_admin(actor)?;
        self.charity_service.get_full(id).await
    }

    pub async fn verify_charity(
        &self,
        actor: &Identity,
        id: &str,
        decision: VerificationStatus,
        reason: Option<String>,
    ) -> Result<Charity, AppError> {
        ensure_admin(actor)?;
        if decision == VerificationStatus::Pending {
            return Err(AppError::Validation("Status must be 'verified' or 'rejected'".into()));
        }

        let mut charity = self.charities.find_by_id(id).await?
            .ok_or(AppError::NotFound("Charity not found".into()))?;
        if charity.verification_status != VerificationStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Charity has already been {}",
                charity.verification_status
            )));
        }

        let now = Utc::now();
        charity.verification_status = decision;
        match decision {
            VerificationStatus::Verified => {
                charity.verified_at = Some(now);
                charity.rejection_reason = None;
            }
            _ => charity.rejection_reason = non_blank(reason),
        }
        charity.updated_at = now;

        let saved = self.charities.update(&charity).await?;
        info!("Charity {} marked {} by admin {}", saved.id, saved.verification_status, actor.user_id);
        Ok(saved)
    }

    // --- Campaigns ---

    pub async fn list_campaigns(&self, actor: &Identity, filter: CampaignFilter) -> Result<Paginated<Campaign>, AppError> {
        ensure_admin(actor)?;
        self.campaigns.list(&filter).await
    }

    pub async fn pending_campaigns(&self, actor: &Identity, page: PageRequest) -> Result<Paginated<Campaign>, AppError> {
        let filter = CampaignFilter {
            status: Some(CampaignStatus::Pending),
            page,
            ..Default::default()
        };
        self.list_campaigns(actor, filter).await
    }

    pub async fn approve_campaign(&self, actor: &Identity, id: &str) -> Result<Campaign, AppError> {
        self.decide_campaign(actor, id, CampaignStatus::Active, None).await
    }

    pub async fn reject_campaign(&self, actor: &Identity, id: &str, reason: Option<String>) -> Result<Campaign, AppError> {
        self.decide_campaign(actor, id, CampaignStatus::Rejected, reason).await
    }

    async fn decide_campaign(
        &self,
        actor: &Identity,
        id: &str,
        target: CampaignStatus,
        reason: Option<String>,
    ) -> Result<Campaign, AppError> {
        ensure_admin(actor)?;

        let mut campaign = self.campaigns.find_by_id(id).await?
            .ok_or(AppError::NotFound("Campaign not found".into()))?;
        if campaign.status != CampaignStatus::Pending {
            return Err(AppError::Conflict(format!("Campaign is already {}", campaign.status)));
        }

        let now = Utc::now();
        campaign.status = target;
        if target == CampaignStatus::Active {
            campaign.approved_at = Some(now);
            campaign.rejection_reason = None;
        } else {
            campaign.rejection_reason = non_blank(reason);
        }
        campaign.updated_at = now;

        let saved = self.campaigns.update(&campaign).await?;
        info!("Campaign {} moved to {} by admin {}", saved.id, saved.status, actor.user_id);
        Ok(saved)
    }

    // --- Users ---

    pub async fn list_users(&self, actor: &Identity, filter: UserFilter) -> Result<Paginated<User>, AppError> {
        ensure_admin(actor)?;
        self.users.list(&filter).await
    }

    pub async fn approve_dao(&self, actor: &Identity, id: &str) -> Result<User, AppError> {
        self.decide_dao(actor, id, DaoStatus::Approved).await
    }

    pub async fn reject_dao(&self, actor: &Identity, id: &str) -> Result<User, AppError> {
        self.decide_dao(actor, id, DaoStatus::Rejected).await
    }

    async fn decide_dao(&self, actor: &Identity, id: &str, target: DaoStatus) -> Result<User, AppError> {
        ensure_admin(actor)?;

        let mut user = self.find_user(id).await?;
        if user.dao_status != DaoStatus::Pending {
            return Err(AppError::Conflict("User has no pending DAO application".into()));
        }

        user.dao_status = target;
        user.updated_at = Utc::now();
        let saved = self.users.update(&user).await?;

        info!("DAO application of {} set to {} by admin {}", saved.id, saved.dao_status, actor.user_id);
        Ok(saved)
    }

    pub async fn ban_user(&self, actor: &Identity, id: &str) -> Result<User, AppError> {
        ensure_admin(actor)?;

        let mut user = self.find_user(id).await?;
        if user.role == UserRole::Admin {
            warn!("Admin {} attempted to ban admin {}", actor.user_id, user.id);
            return Err(AppError::Forbidden("Admin accounts cannot be banned".into()));
        }
        if user.status == UserStatus::Banned {
            return Err(AppError::Conflict("User is already banned".into()));
        }

        user.status = UserStatus::Banned;
        user.updated_at = Utc::now();
        let saved = self.users.update(&user).await?;
        self.tokens.delete_refresh_tokens_for_user(&saved.id).await?;

        info!("User {} banned by admin {}", saved.id, actor.user_id);
        Ok(saved)
    }

    pub async fn unban_user(&self, actor: &Identity, id: &str) -> Result<User, AppError> {
        ensure_admin(actor)?;

        let mut user = self.find_user(id).await?;
        if user.status != UserStatus::Banned {
            return Err(AppError::Conflict("User is not banned".into()));
        }

        user.status = UserStatus::Active;
        user.updated_at = Utc::now();
        let saved = self.users.update(&user).await?;

        info!("User {} unbanned by admin {}", saved.id, actor.user_id);
        Ok(saved)
    }

    async fn find_user(&self, id: &str) -> Result<User, AppError> {
        self.users.find_by_id(id).await?
            .ok_or(AppError::NotFound("User not found".into()))
    }

    // --- Votes ---

    pub async fn list_votes(&self, actor: &Identity, page: PageRequest) -> Result<Paginated<Vote>, AppError> {
        ensure_admin(actor)?;
        self.votes.list(page).await
    }

    pub async fn delete_vote(&self, actor: &Identity, id: &str) -> Result<(), AppError> {
        ensure_admin(actor)?;
        self.votes.delete(id).await?;
        info!("Vote {} deleted by admin {}", id, actor.user_id);
        Ok(())
    }
}
