use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use crate::error::{AppError, FieldError};

/// Declarative input checks run before a handler sees the payload.
pub trait Validate {
    fn validate(&self) -> Vec<FieldError>;
}

/// JSON body that has been deserialized and passed `Validate`.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        let errors = value.validate();
        if !errors.is_empty() {
            return Err(AppError::InvalidFields(errors));
        }
        Ok(ValidJson(value))
    }
}

/// Query string extractor reporting malformed input as a 400 JSON body.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(ApiQuery(value))
    }
}

pub fn require(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, format!("{} is required", field)));
    }
}

pub fn is_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && domain.contains('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_email("donor@example.com"));
        assert!(is_email("  a.b@mail.example.org "));
        assert!(!is_email("no-at-sign"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("user@localhost"));
        assert!(!is_email("user@.com"));
        assert!(!is_email("us er@example.com"));
    }

    #[test]
    fn require_flags_blank() {
        let mut errors = Vec::new();
        require("title", "   ", &mut errors);
        require("body", "text", &mut errors);
        assert_eq!(errors, vec![FieldError::new("title", "title is required")]);
    }
}
