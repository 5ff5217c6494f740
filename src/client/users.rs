use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super::api_client::ApiClient;
use super::error::ClientError;
use crate::domain::models::user::{DaoStatus, UserRole, UserStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub dao_status: DaoStatus,
    pub avatar_url: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

pub struct UsersApi {
    client: Arc<ApiClient>,
}

impl UsersApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn profile(&self) -> Result<Account, ClientError> {
        self.client.get("/api/users/profile").await
    }

    pub async fn update_profile(&self, changes: &ProfileChanges) -> Result<Account, ClientError> {
        self.client.put("/api/users/profile", changes).await
    }

    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<(), ClientError> {
        self.client
            .put::<Value, _>(
                "/api/users/change-password",
                &json!({ "current_password": current_password, "new_password": new_password }),
            )
            .await?;
        Ok(())
    }

    /// Deactivates the account and drops the local session, since the
    /// server has revoked its refresh tokens.
    pub async fn deactivate(&self) -> Result<(), ClientError> {
        self.client.put::<Value, _>("/api/users/deactivate", &json!({})).await?;
        self.client.session().clear().await
    }

    pub async fn apply_dao(&self) -> Result<DaoStatus, ClientError> {
        #[derive(Deserialize)]
        struct Applied {
            dao_status: DaoStatus,
        }

        let applied: Applied = self.client.post("/api/users/apply-dao", &json!({})).await?;
        Ok(applied.dao_status)
    }
}
