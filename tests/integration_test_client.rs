mod common;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use common::{TestApp, TEST_PASSWORD};
use donatrust_backend::client::{
    ApiClient, ClientError, CampaignChanges, CampaignListParams, CampaignsApi, MemoryStorage, NewCampaign,
    ProfileChanges, RegisterParams, Session, SessionData, SessionStorage, SessionUser, UsersApi,
};
use donatrust_backend::domain::models::{campaign::CampaignStatus, user::{DaoStatus, UserRole}};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const FRESH_ACCESS: &str = "fresh-access";
const VALID_REFRESH: &str = "valid-refresh";

/// Fake API that only accepts `FRESH_ACCESS` and counts every call.
#[derive(Default)]
struct Stub {
    profile_hits: AtomicUsize,
    refresh_hits: AtomicUsize,
    reject_everything: bool,
}

async fn stub_profile(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Response {
    stub.profile_hits.fetch_add(1, Ordering::SeqCst);
    let bearer = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());

    if !stub.reject_everything && bearer == Some(format!("Bearer {}", FRESH_ACCESS).as_str()) {
        Json(json!({
            "id": "u-1",
            "full_name": "Stub User",
            "email": "stub@example.com",
            "phone": null,
            "role": "donor",
            "status": "active",
            "dao_status": "none",
            "avatar_url": null,
            "address": null,
            "created_at": "2025-01-01T00:00:00Z",
        })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" }))).into_response()
    }
}

async fn stub_refresh(State(stub): State<Arc<Stub>>, Json(body): Json<Value>) -> Response {
    stub.refresh_hits.fetch_add(1, Ordering::SeqCst);
    if body["refreshToken"] == VALID_REFRESH {
        Json(json!({ "accessToken": FRESH_ACCESS, "refreshToken": "rotated-refresh" })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" }))).into_response()
    }
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn spawn_stub(stub: Arc<Stub>) -> String {
    let router = Router::new()
        .route("/api/users/profile", get(stub_profile))
        .route("/api/auth/refresh-token", post(stub_refresh))
        .with_state(stub);
    spawn(router).await
}

fn stale_session(refresh_token: &str) -> SessionData {
    SessionData {
        access_token: Some("expired-access".into()),
        refresh_token: Some(refresh_token.into()),
        user: Some(SessionUser {
            id: "u-1".into(),
            full_name: "Stub User".into(),
            email: "stub@example.com".into(),
            role: UserRole::Donor,
        }),
    }
}

#[tokio::test]
async fn test_expired_access_token_is_refreshed_once() {
    let stub = Arc::new(Stub::default());
    let base_url = spawn_stub(stub.clone()).await;

    let storage = Arc::new(MemoryStorage::with(stale_session(VALID_REFRESH)));
    let session = Arc::new(Session::load(storage.clone()).await.unwrap());
    let client = Arc::new(ApiClient::new(base_url, session.clone()).unwrap());
    let users = UsersApi::new(client);

    let account = users.profile().await.unwrap();
    assert_eq!(account.email, "stub@example.com");
    assert_eq!(stub.refresh_hits.load(Ordering::SeqCst), 1);
    assert_eq!(stub.profile_hits.load(Ordering::SeqCst), 2);

    // The new pair is what gets persisted, not the stale one.
    assert_eq!(session.access_token().await.as_deref(), Some(FRESH_ACCESS));
    assert_eq!(session.refresh_token().await.as_deref(), Some("rotated-refresh"));
    let stored = storage.load().await.unwrap().unwrap();
    assert_eq!(stored.access_token.as_deref(), Some(FRESH_ACCESS));

    users.profile().await.unwrap();
    assert_eq!(stub.refresh_hits.load(Ordering::SeqCst), 1);
    assert_eq!(stub.profile_hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_failed_refresh_clears_session_and_surfaces_401() {
    let stub = Arc::new(Stub::default());
    let base_url = spawn_stub(stub.clone()).await;

    let storage = Arc::new(MemoryStorage::with(stale_session("revoked-refresh")));
    let session = Arc::new(Session::load(storage.clone()).await.unwrap());
    let client = Arc::new(ApiClient::new(base_url, session.clone()).unwrap());
    let users = UsersApi::new(client);

    let err = users.profile().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(stub.refresh_hits.load(Ordering::SeqCst), 1);
    assert_eq!(stub.profile_hits.load(Ordering::SeqCst), 1);

    assert_eq!(session.snapshot().await, SessionData::default());
    assert!(storage.load().await.unwrap().is_none());

    // Signed out now: a further 401 does not trigger another exchange.
    let err = users.profile().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(stub.refresh_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_replayed_request_is_not_retried_again() {
    let stub = Arc::new(Stub { reject_everything: true, ..Stub::default() });
    let base_url = spawn_stub(stub.clone()).await;

    let session = Arc::new(Session::load(Arc::new(MemoryStorage::with(stale_session(VALID_REFRESH)))).await.unwrap());
    let client = Arc::new(ApiClient::new(base_url, session.clone()).unwrap());

    let err = UsersApi::new(client).profile().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(stub.refresh_hits.load(Ordering::SeqCst), 1);
    assert_eq!(stub.profile_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_client_against_real_server() {
    let app = TestApp::new().await;
    let base_url = spawn(app.router.clone()).await;

    let session = Arc::new(Session::in_memory());
    let client = Arc::new(ApiClient::new(base_url.clone(), session.clone()).unwrap());
    let users = UsersApi::new(client.clone());

    let registered = client.register(&RegisterParams {
        full_name: "Client Donor".into(),
        email: "client@example.com".into(),
        phone: None,
        password: "client-pass".into(),
        role: None,
    }).await.unwrap();
    assert_eq!(registered.role, UserRole::Donor);
    assert!(!session.is_authenticated().await);

    let err = client.login("client@example.com", "wrong").await.unwrap_err();
    assert!(err.is_unauthorized());

    let user = client.login("client@example.com", "client-pass").await.unwrap();
    assert_eq!(session.user().await, Some(user));

    let account = users.update_profile(&ProfileChanges {
        phone: Some("0900".into()),
        ..Default::default()
    }).await.unwrap();
    assert_eq!(account.phone.as_deref(), Some("0900"));

    assert_eq!(users.apply_dao().await.unwrap(), DaoStatus::Pending);

    let err = users.change_password("nope", "another-pass").await.unwrap_err();
    match err {
        ClientError::Http { status, errors, .. } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(errors[0].field, "current_password");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // A corrupted access token is recovered through the refresh token.
    let refresh = session.refresh_token().await.unwrap();
    session.set_tokens("corrupted".into(), refresh.clone()).await.unwrap();
    let account = users.profile().await.unwrap();
    assert_eq!(account.email, "client@example.com");
    assert_ne!(session.refresh_token().await.unwrap(), refresh);

    client.logout().await.unwrap();
    assert!(!session.is_authenticated().await);
    assert!(users.profile().await.unwrap_err().is_unauthorized());
}

#[tokio::test]
async fn test_campaigns_api_against_real_server() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (owner, charity_id) = app.verified_charity(&admin).await;
    let base_url = spawn(app.router.clone()).await;

    let client = Arc::new(ApiClient::new(base_url, Arc::new(Session::in_memory())).unwrap());
    let campaigns = CampaignsApi::new(client.clone());

    assert_eq!(campaigns.categories().await.unwrap().len(), 10);

    client.login(&owner.user.email, TEST_PASSWORD).await.unwrap();
    let created = campaigns.create(&NewCampaign {
        charity_id: charity_id.clone(),
        title: "Library books".into(),
        description: Some("Books for the district library".into()),
        goal_amount: 500.0,
        start_date: None,
        end_date: None,
        category: Some("education".into()),
        image_url: None,
    }).await.unwrap();
    assert_eq!(created.status, CampaignStatus::Pending);

    let (status, _) = app.put(&format!("/api/admin/campaigns/{}/approve", created.id), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let page = campaigns.list(&CampaignListParams {
        limit: Some(5),
        category: Some("education".into()),
        ..Default::default()
    }).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.limit, 5);
    assert_eq!(page.campaigns[0].id, created.id);

    let updated = campaigns.update(&created.id, &CampaignChanges {
        goal_amount: Some(750.0),
        ..Default::default()
    }).await.unwrap();
    assert_eq!(updated.goal_amount, 750.0);

    let detail = campaigns.get(&created.id).await.unwrap();
    assert_eq!(detail.campaign.title, "Library books");
    assert!(detail.charity.is_some());

    let featured = campaigns.featured(None).await.unwrap();
    assert!(featured.campaigns.is_empty());
    assert_eq!(featured.limit, 6);

    campaigns.delete(&created.id).await.unwrap();
    let err = campaigns.get(&created.id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}
