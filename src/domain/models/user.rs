use serde::Serialize;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::pagination::PageRequest;

string_enum!(UserRole {
    Donor => "donor",
    Charity => "charity",
    Admin => "admin",
});

string_enum!(UserStatus {
    Active => "active",
    Inactive => "inactive",
    Banned => "banned",
});

string_enum!(
    /// Progress of a user's application to become a voting DAO member.
    DaoStatus {
        None => "none",
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
);

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    #[sqlx(try_from = "String")]
    pub status: UserStatus,
    #[sqlx(try_from = "String")]
    pub dao_status: DaoStatus,
    pub avatar_url: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(full_name: String, email: String, phone: Option<String>, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            full_name,
            email,
            phone,
            password_hash,
            role,
            status: UserStatus::Active,
            dao_status: DaoStatus::None,
            avatar_url: None,
            address: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_dao_member(&self) -> bool {
        self.dao_status == DaoStatus::Approved
    }
}

/// Minimal public view of a user, nested into charity detail.
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct UserSummary {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub dao_status: Option<DaoStatus>,
    pub search: Option<String>,
    pub page: PageRequest,
}
