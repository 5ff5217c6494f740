use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::validation::{is_email, require, Validate};
use crate::domain::models::{
    campaign::{CampaignFilter, CampaignSortField, CampaignStatus},
    charity::{CharityFilter, CharityProfile, CharitySortField, VerificationStatus},
    pagination::{PageRequest, SortOrder, DEFAULT_PAGE_LIMIT},
    user::{DaoStatus, UserFilter, UserRole, UserStatus},
    vote::VoteDecision,
};
use crate::domain::services::{
    campaign_service::{CreateCampaignInput, UpdateCampaignInput},
    charity_service::FinancialReportInput,
    news_service::NewsInput,
    user_service::ProfileUpdate,
};
use crate::error::{AppError, FieldError};

// --- Auth ---

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default, alias = "fullName")]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub password: String,
    pub role: Option<String>,
}

impl RegisterRequest {
    pub fn role(&self) -> UserRole {
        self.role.as_deref()
            .and_then(|r| r.parse().ok())
            .unwrap_or(UserRole::Donor)
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require("full_name", &self.full_name, &mut errors);
        if !is_email(&self.email) {
            errors.push(FieldError::new("email", "A valid email address is required"));
        }
        if self.password.len() < 6 {
            errors.push(FieldError::new("password", "Password must be at least 6 characters"));
        }
        if let Some(role) = &self.role {
            if !matches!(role.as_str(), "donor" | "charity") {
                errors.push(FieldError::new("role", "Role must be 'donor' or 'charity'"));
            }
        }
        errors
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require("email", &self.email, &mut errors);
        require("password", &self.password, &mut errors);
        errors
    }
}

#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default, rename = "refreshToken", alias = "refresh_token")]
    pub refresh_token: String,
}

impl Validate for RefreshTokenRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require("refreshToken", &self.refresh_token, &mut errors);
        errors
    }
}

// --- Campaigns ---

#[derive(Deserialize)]
pub struct CreateCampaignRequest {
    pub charity_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal_amount: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl Validate for CreateCampaignRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.charity_id.is_none() {
            errors.push(FieldError::new("charity_id", "Charity is required"));
        }
        if self.title.is_none() {
            errors.push(FieldError::new("title", "Title is required"));
        }
        if self.goal_amount.is_none() {
            errors.push(FieldError::new("goal_amount", "Goal amount is required"));
        }
        errors
    }
}

impl From<CreateCampaignRequest> for CreateCampaignInput {
    fn from(req: CreateCampaignRequest) -> Self {
        Self {
            charity_id: req.charity_id.unwrap_or_default(),
            title: req.title.unwrap_or_default(),
            description: req.description,
            goal_amount: req.goal_amount.unwrap_or_default(),
            start_date: req.start_date,
            end_date: req.end_date,
            category: req.category,
            image_url: req.image_url,
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateCampaignRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal_amount: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub featured: Option<bool>,
}

impl Validate for UpdateCampaignRequest {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl From<UpdateCampaignRequest> for UpdateCampaignInput {
    fn from(req: UpdateCampaignRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            goal_amount: req.goal_amount,
            start_date: req.start_date,
            end_date: req.end_date,
            category: req.category,
            image_url: req.image_url,
            featured: req.featured,
        }
    }
}

#[derive(Deserialize)]
pub struct CampaignUpdateRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl Validate for CampaignUpdateRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require("title", &self.title, &mut errors);
        require("content", &self.content, &mut errors);
        errors
    }
}

// --- Charities ---

#[derive(Deserialize, Default)]
pub struct CharityRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub mission: Option<String>,
    pub license_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub bank_account: Option<String>,
    pub verification_documents: Option<String>,
}

impl Validate for CharityRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(email) = &self.email {
            if !email.trim().is_empty() && !is_email(email) {
                errors.push(FieldError::new("email", "Invalid email address"));
            }
        }
        errors
    }
}

impl From<CharityRequest> for CharityProfile {
    fn from(req: CharityRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            mission: req.mission,
            license_number: req.license_number,
            address: req.address,
            city: req.city,
            phone: req.phone,
            email: req.email,
            website: req.website,
            logo_url: req.logo_url,
            bank_account: req.bank_account,
            verification_documents: req.verification_documents,
        }
    }
}

#[derive(Deserialize)]
pub struct FinancialReportRequest {
    #[serde(default)]
    pub period: String,
    pub total_income: Option<f64>,
    pub total_expense: Option<f64>,
    pub description: Option<String>,
}

impl Validate for FinancialReportRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require("period", &self.period, &mut errors);
        if self.total_income.is_none() {
            errors.push(FieldError::new("total_income", "Total income is required"));
        }
        if self.total_expense.is_none() {
            errors.push(FieldError::new("total_expense", "Total expense is required"));
        }
        errors
    }
}

impl From<FinancialReportRequest> for FinancialReportInput {
    fn from(req: FinancialReportRequest) -> Self {
        Self {
            period: req.period,
            total_income: req.total_income.unwrap_or_default(),
            total_expense: req.total_expense.unwrap_or_default(),
            description: req.description,
        }
    }
}

// --- Users ---

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(alias = "fullName")]
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl Validate for UpdateProfileRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(name) = &self.full_name {
            require("full_name", name, &mut errors);
        }
        errors
    }
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self { full_name: req.full_name, phone: req.phone, address: req.address }
    }
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default, alias = "currentPassword")]
    pub current_password: String,
    #[serde(default, alias = "newPassword")]
    pub new_password: String,
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require("current_password", &self.current_password, &mut errors);
        if self.new_password.len() < 6 {
            errors.push(FieldError::new("new_password", "Password must be at least 6 characters"));
        }
        errors
    }
}

// --- Votes ---

#[derive(Deserialize)]
pub struct VoteRequest {
    #[serde(default)]
    pub target_id: String,
    #[serde(default)]
    pub decision: String,
}

impl VoteRequest {
    pub fn decision(&self) -> Result<VoteDecision, AppError> {
        self.decision.parse()
            .map_err(|_| AppError::InvalidFields(vec![decision_error()]))
    }
}

fn decision_error() -> FieldError {
    FieldError::new("decision", "Decision must be 'approve' or 'reject'")
}

impl Validate for VoteRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require("target_id", &self.target_id, &mut errors);
        if self.decision.parse::<VoteDecision>().is_err() {
            errors.push(decision_error());
        }
        errors
    }
}

// --- Admin ---

#[derive(Deserialize)]
pub struct VerifyCharityRequest {
    #[serde(default)]
    pub status: String,
    pub reason: Option<String>,
}

impl VerifyCharityRequest {
    pub fn decision(&self) -> Result<VerificationStatus, AppError> {
        match self.status.parse::<VerificationStatus>() {
            Ok(status @ (VerificationStatus::Verified | VerificationStatus::Rejected)) => Ok(status),
            _ => Err(AppError::InvalidFields(vec![verify_status_error()])),
        }
    }
}

fn verify_status_error() -> FieldError {
    FieldError::new("status", "Status must be 'verified' or 'rejected'")
}

impl Validate for VerifyCharityRequest {
    fn validate(&self) -> Vec<FieldError> {
        match self.decision() {
            Ok(_) => Vec::new(),
            Err(_) => vec![verify_status_error()],
        }
    }
}

#[derive(Deserialize, Default)]
pub struct RejectCampaignRequest {
    pub reason: Option<String>,
}

impl Validate for RejectCampaignRequest {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

#[derive(Deserialize)]
pub struct NewsRequest {
    pub title: Option<String>,
    #[serde(alias = "content")]
    pub body: Option<String>,
}

impl Validate for NewsRequest {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl From<NewsRequest> for NewsInput {
    fn from(req: NewsRequest) -> Self {
        Self { title: req.title, body: req.body }
    }
}

// --- Query strings ---
//
// Every value arrives as a raw string so that malformed input becomes a
// field error instead of an opaque deserialization failure.

fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_field<T: FromStr>(field: &str, raw: &Option<String>, errors: &mut Vec<FieldError>) -> Option<T> {
    let value = non_empty(raw)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.push(FieldError::new(field, format!("Invalid {} '{}'", field, value)));
            None
        }
    }
}

fn parse_order(raw: &Option<String>, errors: &mut Vec<FieldError>) -> SortOrder {
    match non_empty(raw) {
        None => SortOrder::Desc,
        Some(value) => SortOrder::parse_loose(value).unwrap_or_else(|| {
            errors.push(FieldError::new("order", "Order must be ASC or DESC"));
            SortOrder::Desc
        }),
    }
}

fn finish<T>(value: T, errors: Vec<FieldError>) -> Result<T, AppError> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(AppError::InvalidFields(errors))
    }
}

#[derive(Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    fn parse(&self, errors: &mut Vec<FieldError>) -> PageRequest {
        let page = parse_field::<u32>("page", &self.page, errors).unwrap_or(1);
        let limit = parse_field::<u32>("limit", &self.limit, errors).unwrap_or(DEFAULT_PAGE_LIMIT);
        PageRequest::new(page, limit)
    }

    pub fn into_page(self) -> Result<PageRequest, AppError> {
        let mut errors = Vec::new();
        let page = self.parse(&mut errors);
        finish(page, errors)
    }
}

#[derive(Deserialize, Default)]
pub struct CampaignQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub charity_id: Option<String>,
    pub featured: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl CampaignQuery {
    pub fn into_filter(self) -> Result<CampaignFilter, AppError> {
        let mut errors = Vec::new();
        let filter = CampaignFilter {
            page: self.page.parse(&mut errors),
            search: non_empty(&self.search).map(str::to_string),
            category: non_empty(&self.category).map(str::to_string),
            status: parse_field::<CampaignStatus>("status", &self.status, &mut errors),
            charity_id: non_empty(&self.charity_id).map(str::to_string),
            featured: parse_field::<bool>("featured", &self.featured, &mut errors),
            verified_charities_only: false,
            sort: parse_field::<CampaignSortField>("sort", &self.sort, &mut errors)
                .unwrap_or(CampaignSortField::CreatedAt),
            order: parse_order(&self.order, &mut errors),
        };
        finish(filter, errors)
    }
}

#[derive(Deserialize, Default)]
pub struct FeaturedQuery {
    pub limit: Option<String>,
}

impl FeaturedQuery {
    pub fn into_limit(self) -> Result<Option<u32>, AppError> {
        let mut errors = Vec::new();
        let limit = parse_field::<u32>("limit", &self.limit, &mut errors);
        finish(limit, errors)
    }
}

#[derive(Deserialize, Default)]
pub struct CharityQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub search: Option<String>,
    pub city: Option<String>,
    #[serde(alias = "status")]
    pub verification_status: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl CharityQuery {
    pub fn into_filter(self) -> Result<CharityFilter, AppError> {
        let mut errors = Vec::new();
        let filter = CharityFilter {
            page: self.page.parse(&mut errors),
            search: non_empty(&self.search).map(str::to_string),
            city: non_empty(&self.city).map(str::to_string),
            verification_status: parse_field::<VerificationStatus>(
                "verification_status",
                &self.verification_status,
                &mut errors,
            ),
            sort: parse_field::<CharitySortField>("sort", &self.sort, &mut errors)
                .unwrap_or(CharitySortField::CreatedAt),
            order: parse_order(&self.order, &mut errors),
        };
        finish(filter, errors)
    }
}

#[derive(Deserialize, Default)]
pub struct UserQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub role: Option<String>,
    pub status: Option<String>,
    pub dao_status: Option<String>,
    pub search: Option<String>,
}

impl UserQuery {
    pub fn into_filter(self) -> Result<UserFilter, AppError> {
        let mut errors = Vec::new();
        let filter = UserFilter {
            page: self.page.parse(&mut errors),
            role: parse_field::<UserRole>("role", &self.role, &mut errors),
            status: parse_field::<UserStatus>("status", &self.status, &mut errors),
            dao_status: parse_field::<DaoStatus>("dao_status", &self.dao_status, &mut errors),
            search: non_empty(&self.search).map(str::to_string),
        };
        finish(filter, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn campaign_query_defaults() {
        let filter = CampaignQuery::default().into_filter().unwrap();
        assert_eq!(filter.page, PageRequest::new(1, DEFAULT_PAGE_LIMIT));
        assert_eq!(filter.sort, CampaignSortField::CreatedAt);
        assert_eq!(filter.order, SortOrder::Desc);
        assert!(filter.status.is_none());
        assert!(filter.featured.is_none());
    }

    #[test]
    fn campaign_query_parses_every_field() {
        let query = CampaignQuery {
            page: PageQuery { page: some("2"), limit: some("500") },
            search: some(" water "),
            category: some("health"),
            status: some("completed"),
            charity_id: some("c-1"),
            featured: some("true"),
            sort: some("goal_amount"),
            order: some("asc"),
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.page.page, 2);
        assert_eq!(filter.page.limit, 100);
        assert_eq!(filter.search.as_deref(), Some("water"));
        assert_eq!(filter.status, Some(CampaignStatus::Completed));
        assert_eq!(filter.featured, Some(true));
        assert_eq!(filter.sort, CampaignSortField::GoalAmount);
        assert_eq!(filter.order, SortOrder::Asc);
    }

    #[test]
    fn campaign_query_rejects_unknown_values() {
        let query = CampaignQuery {
            sort: some("title; DROP TABLE campaigns"),
            order: some("sideways"),
            status: some("archived"),
            page: PageQuery { page: some("abc"), limit: None },
            ..Default::default()
        };
        match query.into_filter() {
            Err(AppError::InvalidFields(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["page", "status", "sort", "order"]);
            }
            other => panic!("expected field errors, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn user_query_parses_enums() {
        let query = UserQuery {
            role: some("charity"),
            status: some("banned"),
            dao_status: some("pending"),
            ..Default::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.role, Some(UserRole::Charity));
        assert_eq!(filter.status, Some(UserStatus::Banned));
        assert_eq!(filter.dao_status, Some(DaoStatus::Pending));

        let bad = UserQuery { role: some("superuser"), ..Default::default() };
        assert!(bad.into_filter().is_err());
    }

    #[test]
    fn register_request_validation() {
        let req = RegisterRequest {
            full_name: "".into(),
            email: "nope".into(),
            phone: None,
            password: "123".into(),
            role: Some("admin".into()),
        };
        let fields: Vec<_> = req.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["full_name", "email", "password", "role"]);

        let ok = RegisterRequest {
            full_name: "Lan".into(),
            email: "lan@example.com".into(),
            phone: None,
            password: "secret1".into(),
            role: None,
        };
        assert!(ok.validate().is_empty());
        assert_eq!(ok.role(), UserRole::Donor);
    }
}
