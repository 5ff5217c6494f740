use serde::Serialize;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::{
    campaign::Campaign, financial_report::FinancialReport, pagination::{PageRequest, SortOrder},
    user::UserSummary,
};

string_enum!(VerificationStatus {
    Pending => "pending",
    Verified => "verified",
    Rejected => "rejected",
});

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct Charity {
    pub id: String,
    pub user_id: String,
    pub name: String,
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
    #[sqlx(try_from = "String")]
    pub verification_status: VerificationStatus,
    pub rejection_reason: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable charity attributes, shared by registration and updates.
#[derive(Debug, Clone, Default)]
pub struct CharityProfile {
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

impl Charity {
    pub fn new(user_id: String, name: String, profile: CharityProfile) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            name,
            description: profile.description,
            mission: profile.mission,
            license_number: profile.license_number,
            address: profile.address,
            city: profile.city,
            phone: profile.phone,
            email: profile.email,
            website: profile.website,
            logo_url: profile.logo_url,
            bank_account: profile.bank_account,
            verification_documents: profile.verification_documents,
            verification_status: VerificationStatus::Pending,
            rejection_reason: None,
            verified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, profile: CharityProfile) {
        if let Some(val) = profile.name { self.name = val; }
        if let Some(val) = profile.description { self.description = Some(val); }
        if let Some(val) = profile.mission { self.mission = Some(val); }
        if let Some(val) = profile.license_number { self.license_number = Some(val); }
        if let Some(val) = profile.address { self.address = Some(val); }
        if let Some(val) = profile.city { self.city = Some(val); }
        if let Some(val) = profile.phone { self.phone = Some(val); }
        if let Some(val) = profile.email { self.email = Some(val); }
        if let Some(val) = profile.website { self.website = Some(val); }
        if let Some(val) = profile.logo_url { self.logo_url = Some(val); }
        if let Some(val) = profile.bank_account { self.bank_account = Some(val); }
        if let Some(val) = profile.verification_documents { self.verification_documents = Some(val); }
        self.updated_at = Utc::now();
    }
}

/// Charity as shown to the public: banking details and verification
/// documents are never part of this projection.
#[derive(Debug, Serialize, Clone)]
pub struct PublicCharity {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub mission: Option<String>,
    pub license_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub verification_status: VerificationStatus,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Charity> for PublicCharity {
    fn from(c: Charity) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            name: c.name,
            description: c.description,
            mission: c.mission,
            license_number: c.license_number,
            address: c.address,
            city: c.city,
            phone: c.phone,
            email: c.email,
            website: c.website,
            logo_url: c.logo_url,
            verification_status: c.verification_status,
            verified_at: c.verified_at,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct CharitySummary {
    pub id: String,
    pub name: String,
    pub city: Option<String>,
    pub logo_url: Option<String>,
    #[sqlx(try_from = "String")]
    pub verification_status: VerificationStatus,
}

impl From<&Charity> for CharitySummary {
    fn from(c: &Charity) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            city: c.city.clone(),
            logo_url: c.logo_url.clone(),
            verification_status: c.verification_status,
        }
    }
}

/// Charity with its owner, campaigns and reports. Public callers get the
/// `PublicCharity` projection; admins see the full record.
#[derive(Debug, Serialize)]
pub struct CharityDetail<C = PublicCharity> {
    #[serde(flatten)]
    pub charity: C,
    pub user: Option<UserSummary>,
    pub campaigns: Vec<Campaign>,
    pub financial_reports: Vec<FinancialReport>,
}

string_enum!(CharitySortField {
    CreatedAt => "created_at",
    Name => "name",
});

#[derive(Debug, Clone)]
pub struct CharityFilter {
    pub verification_status: Option<VerificationStatus>,
    pub search: Option<String>,
    pub city: Option<String>,
    pub sort: CharitySortField,
    pub order: SortOrder,
    pub page: PageRequest,
}

impl Default for CharityFilter {
    fn default() -> Self {
        Self {
            verification_status: None,
            search: None,
            city: None,
            sort: CharitySortField::CreatedAt,
            order: SortOrder::Desc,
            page: PageRequest::default(),
        }
    }
}
