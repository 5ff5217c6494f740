use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Request},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{admin, auth, campaign, charity, health, news, user, vote};
use crate::api::middleware::require_admin;
use crate::domain::services::user_service::MAX_AVATAR_BYTES;
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
    services::ServeDir,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

// Multipart framing on top of the file itself.
const AVATAR_BODY_LIMIT: usize = MAX_AVATAR_BYTES + 64 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let admin_routes = Router::new()
        .route("/dashboard/stats", get(admin::dashboard_stats))

        // Charities
        .route("/charities", get(admin::list_charities))
        .route("/charities/pending", get(admin::pending_charities))
        .route("/charities/{id}", get(admin::get_charity))
        .route("/charities/{id}/verify", put(admin::verify_charity))

        // Campaigns
        .route("/campaigns", get(admin::list_campaigns))
        .route("/campaigns/pending", get(admin::pending_campaigns))
        .route("/campaigns/{id}/approve", put(admin::approve_campaign))
        .route("/campaigns/{id}/reject", put(admin::reject_campaign))

        // Users
        .route("/users", get(admin::list_users))
        .route("/users/{id}/approve-dao", put(admin::approve_dao))
        .route("/users/{id}/reject-dao", put(admin::reject_dao))
        .route("/users/{id}/ban", put(admin::ban_user))
        .route("/users/{id}/unban", put(admin::unban_user))

        // Votes
        .route("/votes", get(admin::list_votes))
        .route("/votes/{id}", delete(admin::delete_vote))

        // News
        .route("/news", get(admin::list_news).post(admin::create_news))
        .route("/news/{id}", get(admin::get_news).put(admin::update_news).delete(admin::delete_news))
        .route("/news/{id}/publish", put(admin::publish_news))

        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh-token", post(auth::refresh_token))
        .route("/api/auth/logout", post(auth::logout))

        // Campaigns
        .route("/api/campaigns", get(campaign::list_campaigns).post(campaign::create_campaign))
        .route("/api/campaigns/featured", get(campaign::featured_campaigns))
        .route("/api/campaigns/categories", get(campaign::categories))
        .route("/api/campaigns/{id}", get(campaign::get_campaign).put(campaign::update_campaign).delete(campaign::delete_campaign))
        .route("/api/campaigns/{id}/updates", post(campaign::add_progress_update))

        // Charities
        .route("/api/charities", get(charity::list_charities))
        .route("/api/charities/register", post(charity::register_charity))
        .route("/api/charities/me", get(charity::my_charity).put(charity::update_my_charity))
        .route("/api/charities/me/financial-reports", post(charity::add_financial_report))
        .route("/api/charities/{id}", get(charity::get_charity).put(charity::update_charity).delete(charity::delete_charity))
        .route("/api/charities/{id}/financial-reports", get(charity::financial_reports))

        // Users
        .route("/api/users/profile", get(user::get_profile).put(user::update_profile))
        .route("/api/users/change-password", put(user::change_password))
        .route(
            "/api/users/upload-avatar",
            post(user::upload_avatar).layer(DefaultBodyLimit::max(AVATAR_BODY_LIMIT)),
        )
        .route("/api/users/deactivate", put(user::deactivate))
        .route("/api/users/apply-dao", post(user::apply_dao))

        // Votes & News
        .route("/api/votes", post(vote::cast_vote))
        .route("/api/news", get(news::list_news))
        .route("/api/news/{id}", get(news::get_news))

        .nest("/api/admin", admin_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                        role = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
