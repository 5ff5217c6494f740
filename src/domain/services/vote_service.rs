use std::sync::Arc;
use crate::domain::{
    models::{auth::Identity, user::UserStatus, vote::{Vote, VoteDecision}},
    ports::{CampaignRepository, CharityRepository, UserRepository, VoteRepository},
};
use crate::error::{is_unique_violation, AppError};
use tracing::info;

pub struct VoteService {
    votes: Arc<dyn VoteRepository>,
    users: Arc<dyn UserRepository>,
    campaigns: Arc<dyn CampaignRepository>,
    charities: Arc<dyn CharityRepository>,
}

impl VoteService {
    pub fn new(
        votes: Arc<dyn VoteRepository>,
        users: Arc<dyn UserRepository>,
        campaigns: Arc<dyn CampaignRepository>,
        charities: Arc<dyn CharityRepository>,
    ) -> Self {
        Self { votes, users, campaigns, charities }
    }

    /// Records a DAO member's decision on a campaign or charity under review.
    pub async fn cast(&self, actor: &Identity, target_id: &str, decision: VoteDecision) -> Result<Vote, AppError> {
        let voter = self.users.find_by_id(&actor.user_id).await?
            .ok_or(AppError::Unauthorized)?;
        if voter.status != UserStatus::Active || !voter.is_dao_member() {
            return Err(AppError::Forbidden("Only approved DAO members can vote".into()));
        }

        let target_exists = self.campaigns.find_by_id(target_id).await?.is_some()
            || self.charities.find_by_id(target_id).await?.is_some();
        if !target_exists {
            return Err(AppError::NotFound("Vote target not found".into()));
        }

        let vote = Vote::new(voter.id, target_id.to_string(), decision);
        let saved = self.votes.create(&vote).await.map_err(|e| match e {
            AppError::Database(db) if is_unique_violation(&db) => {
                AppError::Conflict("You have already voted on this item".into())
            }
            other => other,
        })?;

        info!("Vote {} ({}) cast on {} by {}", saved.id, saved.decision, saved.target_id, actor.user_id);
        Ok(saved)
    }
}
