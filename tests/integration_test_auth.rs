mod common;

use axum::http::StatusCode;
use common::{TestApp, TEST_PASSWORD};
use donatrust_backend::domain::models::user::UserRole;
use serde_json::json;

#[tokio::test]
async fn test_register_login_and_profile() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/api/auth/register", None, json!({
        "full_name": "Minh Tran",
        "email": "Minh@Example.com ",
        "password": "hunter22",
    })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "donor");
    assert_eq!(body["user"]["email"], "minh@example.com");
    assert!(body["user"].get("password_hash").is_none());

    let tokens = app.login("minh@example.com", "hunter22").await;
    assert!(!tokens.access_token.is_empty());
    assert_eq!(tokens.refresh_token.len(), 64);

    let (status, profile) = app.get("/api/users/profile", Some(&tokens.access_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["full_name"], "Minh Tran");
    assert_eq!(profile["status"], "active");
    assert_eq!(profile["dao_status"], "none");
    assert!(profile.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_bad_input() {
    let app = TestApp::new().await;

    let payload = json!({ "full_name": "A", "email": "dup@example.com", "password": "hunter22" });
    let (status, _) = app.post("/api/auth/register", None, payload).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.post("/api/auth/register", None, json!({
        "full_name": "B",
        "email": "DUP@example.com",
        "password": "hunter22",
    })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].is_string());

    let (status, body) = app.post("/api/auth/register", None, json!({
        "full_name": "",
        "email": "not-an-email",
        "password": "123",
    })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"].as_array().unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"full_name"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));

    // Admin accounts are never self-service.
    let (status, _) = app.post("/api/auth/register", None, json!({
        "full_name": "Mallory",
        "email": "mallory@example.com",
        "password": "hunter22",
        "role": "admin",
    })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.request(
        axum::http::Method::POST,
        "/api/auth/register",
        None,
        None,
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_bad_credentials_is_unauthorized() {
    let app = TestApp::new().await;
    let user = app.create_user(UserRole::Donor).await;

    let (status, _) = app.post("/api/auth/login", None, json!({
        "email": user.email,
        "password": "wrong-password",
    })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.post("/api/auth/login", None, json!({
        "email": "nobody@example.com",
        "password": TEST_PASSWORD,
    })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    let app = TestApp::new().await;
    let donor = app.signed_in(UserRole::Donor).await;

    let (status, body) = app.post("/api/auth/refresh-token", None, json!({
        "refreshToken": donor.tokens.refresh_token,
    })).await;
    assert_eq!(status, StatusCode::OK);
    let new_access = body["accessToken"].as_str().unwrap().to_string();
    let new_refresh = body["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(new_refresh, donor.tokens.refresh_token);

    // The consumed token is gone.
    let (status, _) = app.post("/api/auth/refresh-token", None, json!({
        "refreshToken": donor.tokens.refresh_token,
    })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/users/profile", Some(&new_access)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.post("/api/auth/refresh-token", None, json!({
        "refreshToken": new_refresh,
    })).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let app = TestApp::new().await;
    let donor = app.signed_in(UserRole::Donor).await;

    let (status, _) = app.post("/api/auth/logout", None, json!({
        "refreshToken": donor.tokens.refresh_token,
    })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.post("/api/auth/refresh-token", None, json!({
        "refreshToken": donor.tokens.refresh_token,
    })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.post("/api/auth/refresh-token", None, json!({
        "refreshToken": "not-a-real-token",
    })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_valid_token() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/api/users/profile", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/users/profile", Some("garbage.token.value")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
