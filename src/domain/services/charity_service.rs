use std::sync::Arc;
use crate::domain::{
    models::{
        auth::Identity,
        campaign::{CampaignFilter, CampaignStatus},
        charity::{Charity, CharityDetail, CharityFilter, CharityProfile, PublicCharity, VerificationStatus},
        financial_report::FinancialReport,
        pagination::{PageRequest, Paginated, MAX_PAGE_LIMIT},
        user::{UserRole, UserSummary},
    },
    ports::{
        CampaignRepository, CharityRepository, FinancialReportRepository, UserRepository,
        DUPLICATE_CHARITY_MSG, DUPLICATE_LICENSE_MSG,
    },
};
use crate::domain::services::{ensure_manages, fail_on, non_blank};
use crate::error::{AppError, FieldError};
use tracing::{info, warn};

pub struct FinancialReportInput {
    pub period: String,
    pub total_income: f64,
    pub total_expense: f64,
    pub description: Option<String>,
}

pub struct CharityService {
    charities: Arc<dyn CharityRepository>,
    campaigns: Arc<dyn CampaignRepository>,
    reports: Arc<dyn FinancialReportRepository>,
    users: Arc<dyn UserRepository>,
}

/// Blank strings in a submitted profile mean "not provided".
fn clean(profile: CharityProfile) -> CharityProfile {
    CharityProfile {
        name: non_blank(profile.name),
        description: non_blank(profile.description),
        mission: non_blank(profile.mission),
        license_number: non_blank(profile.license_number),
        address: non_blank(profile.address),
        city: non_blank(profile.city),
        phone: non_blank(profile.phone),
        email: non_blank(profile.email),
        website: non_blank(profile.website),
        logo_url: non_blank(profile.logo_url),
        bank_account: non_blank(profile.bank_account),
        verification_documents: non_blank(profile.verification_documents),
    }
}

impl CharityService {
    pub fn new(
        charities: Arc<dyn CharityRepository>,
        campaigns: Arc<dyn CampaignRepository>,
        reports: Arc<dyn FinancialReportRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { charities, campaigns, reports, users }
    }

    pub async fn register(&self, actor: &Identity, profile: CharityProfile) -> Result<Charity, AppError> {
        if actor.role != UserRole::Charity {
            warn!("User {} with role {} attempted charity registration", actor.user_id, actor.role);
            return Err(AppError::Forbidden("Only charity accounts can register a charity".into()));
        }

        let mut profile = clean(profile);
        let name = profile.name.take()
            .ok_or_else(|| AppError::InvalidFields(vec![FieldError::new("name", "Charity name is required")]))?;

        if self.charities.find_by_user(&actor.user_id).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE_CHARITY_MSG.into()));
        }
        if let Some(license) = &profile.license_number {
            if self.charities.find_by_license(license, None).await?.is_some() {
                return Err(AppError::Conflict(DUPLICATE_LICENSE_MSG.into()));
            }
        }

        let charity = Charity::new(actor.user_id.clone(), name, profile);
        let created = self.charities.register(&charity).await?;

        info!("Charity {} registered by user {}", created.id, actor.user_id);
        Ok(created)
    }

    pub async fn list_public(&self, mut filter: CharityFilter) -> Result<Paginated<PublicCharity>, AppError> {
        filter.verification_status.get_or_insert(VerificationStatus::Verified);
        Ok(self.charities.list(&filter).await?.map(PublicCharity::from))
    }

    pub async fn get_public(&self, id: &str) -> Result<CharityDetail, AppError> {
        let charity = self.find(id).await?;
        let user = self.users.find_by_id(&charity.user_id).await?
            .map(|u| UserSummary::from(&u));

        let filter = CampaignFilter {
            charity_id: Some(charity.id.clone()),
            status: Some(CampaignStatus::Active),
            page: PageRequest::new(1, MAX_PAGE_LIMIT),
            ..CampaignFilter::default()
        };
        let campaigns = self.campaigns.list(&filter).await?.items;
        let financial_reports = self.reports.list_by_charity(&charity.id).await?;

        Ok(CharityDetail {
            charity: PublicCharity::from(charity),
            user,
            campaigns,
            financial_reports,
        })
    }

    /// Full record including every campaign regardless of status.
    pub async fn get_full(&self, id: &str) -> Result<CharityDetail<Charity>, AppError> {
        let charity = self.find(id).await?;
        let user = self.users.find_by_id(&charity.user_id).await?
            .map(|u| UserSummary::from(&u));

        let filter = CampaignFilter {
            charity_id: Some(charity.id.clone()),
            page: PageRequest::new(1, MAX_PAGE_LIMIT),
            ..CampaignFilter::default()
        };
        let campaigns = self.campaigns.list(&filter).await?.items;
        let financial_reports = self.reports.list_by_charity(&charity.id).await?;

        Ok(CharityDetail { charity, user, campaigns, financial_reports })
    }

    pub async fn my_charity(&self, actor: &Identity) -> Result<Charity, AppError> {
        self.charities.find_by_user(&actor.user_id).await?
            .ok_or(AppError::NotFound("You have not registered a charity".into()))
    }

    pub async fn update_mine(&self, actor: &Identity, profile: CharityProfile) -> Result<Charity, AppError> {
        let charity = self.my_charity(actor).await?;
        self.save_profile(charity, profile).await
    }

    pub async fn update(&self, actor: &Identity, id: &str, profile: CharityProfile) -> Result<Charity, AppError> {
        let charity = self.find(id).await?;
        ensure_manages(actor, &charity)?;
        self.save_profile(charity, profile).await
    }

    pub async fn delete(&self, actor: &Identity, id: &str) -> Result<(), AppError> {
        let charity = self.find(id).await?;
        ensure_manages(actor, &charity)?;

        let campaign_count = self.campaigns.count_by_charity(&charity.id).await?;
        if campaign_count > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete a charity that still has {} campaign(s)",
                campaign_count
            )));
        }

        self.charities.delete(&charity.id).await?;
        info!("Charity {} deleted by {}", charity.id, actor.user_id);
        Ok(())
    }

    pub async fn add_financial_report(&self, actor: &Identity, input: FinancialReportInput) -> Result<FinancialReport, AppError> {
        let charity = self.my_charity(actor).await?;

        let mut errors = Vec::new();
        if input.period.trim().is_empty() {
            errors.push(FieldError::new("period", "Period is required"));
        }
        if !input.total_income.is_finite() || input.total_income < 0.0 {
            errors.push(FieldError::new("total_income", "Total income must be greater than or equal to 0"));
        }
        if !input.total_expense.is_finite() || input.total_expense < 0.0 {
            errors.push(FieldError::new("total_expense", "Total expense must be greater than or equal to 0"));
        }
        fail_on(errors)?;

        let report = FinancialReport::new(
            charity.id,
            input.period.trim().to_string(),
            input.total_income,
            input.total_expense,
            non_blank(input.description),
        );
        self.reports.create(&report).await
    }

    pub async fn financial_reports(&self, id: &str) -> Result<Vec<FinancialReport>, AppError> {
        let charity = self.find(id).await?;
        self.reports.list_by_charity(&charity.id).await
    }

    async fn find(&self, id: &str) -> Result<Charity, AppError> {
        self.charities.find_by_id(id).await?
            .ok_or(AppError::NotFound("Charity not found".into()))
    }

    async fn save_profile(&self, mut charity: Charity, profile: CharityProfile) -> Result<Charity, AppError> {
        let profile = clean(profile);
        if let Some(license) = &profile.license_number {
            if self.charities.find_by_license(license, Some(&charity.id)).await?.is_some() {
                return Err(AppError::Conflict(DUPLICATE_LICENSE_MSG.into()));
            }
        }

        charity.apply(profile);
        self.charities.update(&charity).await
    }
}
