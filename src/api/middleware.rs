use axum::{extract::Request, middleware::Next, response::Response};
use crate::api::extractors::auth::AuthUser;
use crate::error::AppError;
use tracing::warn;

/// Route layer for `/api/admin`: rejects before any handler runs.
pub async fn require_admin(
    AuthUser(identity): AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !identity.is_admin() {
        warn!("Non-admin {} denied access to {}", identity.user_id, request.uri().path());
        return Err(AppError::Forbidden("Admin access required".into()));
    }
    Ok(next.run(request).await)
}
