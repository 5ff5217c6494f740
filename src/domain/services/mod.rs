pub mod admin_service;
pub mod auth_service;
pub mod campaign_service;
pub mod charity_service;
pub mod news_service;
pub mod user_service;
pub mod vote_service;

use crate::domain::models::{auth::Identity, charity::Charity};
use crate::error::{AppError, FieldError};

pub(crate) fn ensure_admin(actor: &Identity) -> Result<(), AppError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin access required".into()))
    }
}

pub(crate) fn ensure_manages(actor: &Identity, charity: &Charity) -> Result<(), AppError> {
    if actor.is_admin() || charity.user_id == actor.user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden("You do not manage this charity".into()))
    }
}

pub(crate) fn fail_on(errors: Vec<FieldError>) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidFields(errors))
    }
}

/// Trims an optional free-text value, treating blank input as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
