use std::path::PathBuf;
use std::sync::Arc;
use crate::domain::{
    models::{
        auth::Identity,
        user::{DaoStatus, User, UserStatus},
    },
    ports::{AuthRepository, UserRepository},
};
use crate::domain::services::{
    auth_service::{hash_password, verify_password},
    fail_on, non_blank,
};
use crate::error::{AppError, FieldError};
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;
pub const AVATAR_DIR: &str = "avatars";

#[derive(Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn AuthRepository>,
    upload_dir: PathBuf,
}

/// File extension for an accepted image content type.
fn image_extension(content_type: &str) -> Option<String> {
    let subtype = content_type.strip_prefix("image/")?;
    let ext = match subtype {
        "jpeg" | "pjpeg" => "jpg".to_string(),
        "svg+xml" => "svg".to_string(),
        other => other.chars().filter(|c| c.is_ascii_alphanumeric()).collect(),
    };
    (!ext.is_empty()).then_some(ext)
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<dyn AuthRepository>, upload_dir: impl Into<PathBuf>) -> Self {
        Self { users, tokens, upload_dir: upload_dir.into() }
    }

    pub async fn profile(&self, actor: &Identity) -> Result<User, AppError> {
        self.users.find_by_id(&actor.user_id).await?
            .ok_or(AppError::NotFound("User not found".into()))
    }

    pub async fn update_profile(&self, actor: &Identity, update: ProfileUpdate) -> Result<User, AppError> {
        let mut user = self.profile(actor).await?;

        if let Some(full_name) = update.full_name {
            let full_name = full_name.trim().to_string();
            if full_name.is_empty() {
                return Err(AppError::InvalidFields(vec![FieldError::new("full_name", "Full name cannot be empty")]));
            }
            user.full_name = full_name;
        }
        if update.phone.is_some() { user.phone = non_blank(update.phone); }
        if update.address.is_some() { user.address = non_blank(update.address); }
        user.updated_at = Utc::now();

        self.users.update(&user).await
    }

    pub async fn change_password(&self, actor: &Identity, current_password: &str, new_password: &str) -> Result<(), AppError> {
        let mut user = self.profile(actor).await?;

        let mut errors = Vec::new();
        if !verify_password(current_password, &user.password_hash)? {
            errors.push(FieldError::new("current_password", "Current password is incorrect"));
        }
        if new_password.len() < 6 {
            errors.push(FieldError::new("new_password", "Password must be at least 6 characters"));
        }
        fail_on(errors)?;

        user.password_hash = hash_password(new_password)?;
        user.updated_at = Utc::now();
        self.users.update(&user).await?;

        info!("Password changed for user {}", user.id);
        Ok(())
    }

    /// Stores the image under the upload directory and records its public URL.
    pub async fn upload_avatar(&self, actor: &Identity, content_type: &str, data: &[u8]) -> Result<User, AppError> {
        let ext = image_extension(content_type)
            .ok_or_else(|| AppError::Validation("Only image files are allowed".into()))?;
        if data.is_empty() {
            return Err(AppError::Validation("Avatar file is empty".into()));
        }
        if data.len() > MAX_AVATAR_BYTES {
            return Err(AppError::Validation("Avatar must not exceed 5MB".into()));
        }

        let mut user = self.profile(actor).await?;

        let dir = self.upload_dir.join(AVATAR_DIR);
        let file_name = format!("{}-{}.{}", user.id, Uuid::new_v4(), ext);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            error!("Failed to create avatar directory {:?}: {}", dir, e);
            AppError::InternalWithMsg("Could not store avatar".into())
        })?;
        tokio::fs::write(dir.join(&file_name), data).await.map_err(|e| {
            error!("Failed to write avatar {}: {}", file_name, e);
            AppError::InternalWithMsg("Could not store avatar".into())
        })?;

        user.avatar_url = Some(format!("/uploads/{}/{}", AVATAR_DIR, file_name));
        user.updated_at = Utc::now();
        self.users.update(&user).await
    }

    pub async fn deactivate(&self, actor: &Identity) -> Result<User, AppError> {
        let mut user = self.profile(actor).await?;

        user.status = UserStatus::Inactive;
        user.updated_at = Utc::now();
        let user = self.users.update(&user).await?;
        self.tokens.delete_refresh_tokens_for_user(&user.id).await?;

        info!("User {} deactivated their account", user.id);
        Ok(user)
    }

    pub async fn apply_dao(&self, actor: &Identity) -> Result<User, AppError> {
        let mut user = self.profile(actor).await?;

        match user.dao_status {
            DaoStatus::Pending => return Err(AppError::Conflict("DAO application is already pending".into())),
            DaoStatus::Approved => return Err(AppError::Conflict("You are already a DAO member".into())),
            DaoStatus::None | DaoStatus::Rejected => {}
        }

        user.dao_status = DaoStatus::Pending;
        user.updated_at = Utc::now();
        let user = self.users.update(&user).await?;

        info!("User {} applied for DAO membership", user.id);
        Ok(user)
    }
}
