use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts, HeaderMap},
};
use crate::state::AppState;
use crate::domain::models::auth::Identity;
use crate::error::AppError;
use std::sync::Arc;
use tracing::Span;

/// Caller authenticated by `Authorization: Bearer <access token>`.
pub struct AuthUser(pub Identity);

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already verified by an outer layer (e.g. the admin guard).
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(AuthUser(identity.clone()));
        }

        let access_token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let identity = app_state.auth_service.authenticate(access_token).await?;

        Span::current().record("user_id", identity.user_id.as_str());
        Span::current().record("role", identity.role.as_str());

        parts.extensions.insert(identity.clone());
        Ok(AuthUser(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::bearer_token;
    use axum::http::{header, HeaderMap, HeaderValue};

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
