use std::sync::Arc;
use crate::domain::ports::{
    AuthRepository, CampaignRepository, CharityRepository, FinancialReportRepository,
    NewsRepository, UserRepository, VoteRepository,
};
use crate::domain::services::{
    admin_service::AdminService, auth_service::AuthService, campaign_service::CampaignService,
    charity_service::CharityService, news_service::NewsService, user_service::UserService,
    vote_service::VoteService,
};
use crate::config::Config;

/// One implementation of every port, all backed by the same pool.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub auth: Arc<dyn AuthRepository>,
    pub charities: Arc<dyn CharityRepository>,
    pub campaigns: Arc<dyn CampaignRepository>,
    pub reports: Arc<dyn FinancialReportRepository>,
    pub votes: Arc<dyn VoteRepository>,
    pub news: Arc<dyn NewsRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_service: Arc<AuthService>,
    pub campaign_service: Arc<CampaignService>,
    pub charity_service: Arc<CharityService>,
    pub user_service: Arc<UserService>,
    pub admin_service: Arc<AdminService>,
    pub news_service: Arc<NewsService>,
    pub vote_service: Arc<VoteService>,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories) -> Self {
        let auth_service = Arc::new(AuthService::new(repos.auth.clone(), repos.users.clone(), config.clone()));
        let charity_service = Arc::new(CharityService::new(
            repos.charities.clone(),
            repos.campaigns.clone(),
            repos.reports.clone(),
            repos.users.clone(),
        ));

        Self {
            campaign_service: Arc::new(CampaignService::new(repos.campaigns.clone(), repos.charities.clone())),
            user_service: Arc::new(UserService::new(repos.users.clone(), repos.auth.clone(), config.upload_dir.clone())),
            admin_service: Arc::new(AdminService::new(
                repos.users.clone(),
                repos.auth.clone(),
                repos.charities.clone(),
                repos.campaigns.clone(),
                repos.votes.clone(),
                repos.news.clone(),
                charity_service.clone(),
            )),
            news_service: Arc::new(NewsService::new(repos.news.clone())),
            vote_service: Arc::new(VoteService::new(
                repos.votes.clone(),
                repos.users.clone(),
                repos.campaigns.clone(),
                repos.charities.clone(),
            )),
            user_repo: repos.users,
            charity_service,
            auth_service,
            config,
        }
    }
}
