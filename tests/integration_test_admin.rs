mod common;

use axum::http::StatusCode;
use common::{TestApp, TEST_PASSWORD};
use donatrust_backend::domain::models::user::UserRole;
use serde_json::json;

#[tokio::test]
async fn test_admin_routes_are_guarded() {
    let app = TestApp::new().await;
    let donor = app.signed_in(UserRole::Donor).await;
    let charity = app.signed_in(UserRole::Charity).await;

    let (status, _) = app.get("/api/admin/dashboard/stats", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    for token in [&donor.tokens.access_token, &charity.tokens.access_token] {
        let (status, body) = app.get("/api/admin/dashboard/stats", Some(token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body["message"].is_string());

        let (status, _) = app.put(&format!("/api/admin/users/{}/ban", donor.user.id), Some(token), json!({})).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_charity_verification_flow() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, accepted) = app.pending_charity("LIC-A").await;
    let (_, declined) = app.pending_charity("LIC-B").await;

    let (status, body) = app.get("/api/admin/charities/pending", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);

    let (status, body) = app.put(&format!("/api/admin/charities/{}/verify", accepted), Some(&admin), json!({ "status": "verified" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verification_status"], "verified");
    assert!(body["verified_at"].is_string());

    let (status, body) = app.put(
        &format!("/api/admin/charities/{}/verify", declined),
        Some(&admin),
        json!({ "status": "rejected", "reason": "License could not be confirmed" }),
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verification_status"], "rejected");
    assert_eq!(body["rejection_reason"], "License could not be confirmed");

    // Decisions are final.
    let (status, _) = app.put(&format!("/api/admin/charities/{}/verify", accepted), Some(&admin), json!({ "status": "rejected" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.put(&format!("/api/admin/charities/{}/verify", accepted), Some(&admin), json!({ "status": "pending" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.put("/api/admin/charities/missing/verify", Some(&admin), json!({ "status": "verified" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/api/admin/charities/pending", Some(&admin)).await;
    assert_eq!(body["total"], 0);

    let (_, body) = app.get("/api/admin/charities?status=rejected", Some(&admin)).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_campaign_approval_flow() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (owner, charity_id) = app.verified_charity(&admin).await;
    let token = owner.tokens.access_token.as_str();

    let (_, body) = app.create_campaign(token, &charity_id, "Approve me", 100.0).await;
    let approve_id = body["id"].as_str().unwrap().to_string();
    let (_, body) = app.create_campaign(token, &charity_id, "Reject me", 100.0).await;
    let reject_id = body["id"].as_str().unwrap().to_string();

    let (_, body) = app.get("/api/admin/campaigns/pending", Some(&admin)).await;
    assert_eq!(body["total"], 2);

    let (status, body) = app.put(&format!("/api/admin/campaigns/{}/approve", approve_id), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert!(body["approved_at"].is_string());

    let (status, body) = app.put(
        &format!("/api/admin/campaigns/{}/reject", reject_id),
        Some(&admin),
        json!({ "reason": "Missing documentation" }),
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["rejection_reason"], "Missing documentation");

    let (status, _) = app.put(&format!("/api/admin/campaigns/{}/approve", reject_id), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = app.get("/api/campaigns", None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["campaigns"][0]["id"], approve_id.as_str());

    let (_, body) = app.get("/api/admin/campaigns?status=rejected", Some(&admin)).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_dashboard_stats() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (owner, charity_id) = app.verified_charity(&admin).await;
    app.active_campaign(&owner.tokens.access_token, &admin, &charity_id, "Counted").await;
    app.create_campaign(&owner.tokens.access_token, &charity_id, "Waiting", 10.0).await;
    app.signed_in(UserRole::Donor).await;

    let (status, body) = app.get("/api/admin/dashboard/stats", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"]["total"], 3);
    assert_eq!(body["users"]["admins"], 1);
    assert_eq!(body["users"]["donors"], 1);
    assert_eq!(body["users"]["charities"], 1);
    assert_eq!(body["charities"]["verified"], 1);
    assert_eq!(body["campaigns"]["total"], 2);
    assert_eq!(body["campaigns"]["active"], 1);
    assert_eq!(body["campaigns"]["pending"], 1);
    assert_eq!(body["votes"], 0);
}

#[tokio::test]
async fn test_ban_and_unban() {
    let app = TestApp::new().await;
    let admin_user = app.signed_in(UserRole::Admin).await;
    let admin = admin_user.tokens.access_token.as_str();
    let donor = app.signed_in(UserRole::Donor).await;

    let (status, body) = app.put(&format!("/api/admin/users/{}/ban", donor.user.id), Some(admin), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "banned");
    assert!(body.get("password_hash").is_none());

    let (status, _) = app.post("/api/auth/login", None, json!({ "email": donor.user.email, "password": TEST_PASSWORD })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.post("/api/auth/refresh-token", None, json!({ "refreshToken": donor.tokens.refresh_token })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.put(&format!("/api/admin/users/{}/ban", donor.user.id), Some(admin), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.put(&format!("/api/admin/users/{}/ban", admin_user.user.id), Some(admin), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app.get("/api/admin/users?status=banned", Some(admin)).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["users"][0]["id"], donor.user.id.as_str());

    let (status, body) = app.put(&format!("/api/admin/users/{}/unban", donor.user.id), Some(admin), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");

    app.login(&donor.user.email, TEST_PASSWORD).await;
}

#[tokio::test]
async fn test_dao_membership_and_voting() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (owner, charity_id) = app.verified_charity(&admin).await;
    let campaign_id = app.active_campaign(&owner.tokens.access_token, &admin, &charity_id, "Vote on me").await;
    let voter = app.signed_in(UserRole::Donor).await;
    let token = voter.tokens.access_token.as_str();

    let vote = json!({ "target_id": campaign_id, "decision": "approve" });

    // Not a DAO member yet.
    let (status, _) = app.post("/api/votes", Some(token), vote.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.post("/api/users/apply-dao", Some(token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dao_status"], "pending");

    let (_, body) = app.get("/api/admin/users?dao_status=pending", Some(&admin)).await;
    assert_eq!(body["total"], 1);

    let (status, body) = app.put(&format!("/api/admin/users/{}/approve-dao", voter.user.id), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dao_status"], "approved");

    let (status, _) = app.put(&format!("/api/admin/users/{}/reject-dao", voter.user.id), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.post("/api/votes", Some(token), vote.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["decision"], "approve");
    let vote_id = body["id"].as_str().unwrap().to_string();

    let (status, _) = app.post("/api/votes", Some(token), vote).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.post("/api/votes", Some(token), json!({ "target_id": "nothing-here", "decision": "approve" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.post("/api/votes", Some(token), json!({ "target_id": charity_id, "decision": "maybe" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.post("/api/votes", Some(token), json!({ "target_id": charity_id, "decision": "reject" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["target_id"], charity_id.as_str());

    let (_, body) = app.get("/api/admin/votes", Some(&admin)).await;
    assert_eq!(body["total"], 2);

    let (status, _) = app.delete(&format!("/api/admin/votes/{}", vote_id), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.delete(&format!("/api/admin/votes/{}", vote_id), Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/api/admin/dashboard/stats", Some(&admin)).await;
    assert_eq!(body["votes"], 1);
    assert_eq!(body["users"]["dao_members"], 1);
}

#[tokio::test]
async fn test_news_publishing() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let donor = app.signed_in(UserRole::Donor).await;

    let (status, _) = app.post("/api/admin/news", Some(&donor.tokens.access_token), json!({ "title": "x", "body": "y" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.post("/api/admin/news", Some(&admin), json!({ "title": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].is_array());

    let (status, body) = app.post("/api/admin/news", Some(&admin), json!({
        "title": "Flood relief update",
        "content": "All donations have been delivered.",
    })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["published"], false);
    let id = body["id"].as_str().unwrap().to_string();

    // Drafts are invisible to the public.
    let (status, _) = app.get(&format!("/api/news/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = app.get("/api/news", None).await;
    assert_eq!(body["total"], 0);

    let (status, body) = app.put(&format!("/api/admin/news/{}", id), Some(&admin), json!({ "title": "Flood relief: delivered" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Flood relief: delivered");
    assert_eq!(body["body"], "All donations have been delivered.");

    let (status, body) = app.put(&format!("/api/admin/news/{}/publish", id), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["published"], true);
    assert!(body["published_at"].is_string());

    let (status, _) = app.put(&format!("/api/admin/news/{}/publish", id), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.get(&format!("/api/news/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Flood relief: delivered");

    let (_, body) = app.get("/api/news", None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["news"].as_array().unwrap().len(), 1);

    let (_, body) = app.get("/api/admin/news", Some(&admin)).await;
    assert_eq!(body["total"], 1);

    let (status, _) = app.delete(&format!("/api/admin/news/{}", id), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/admin/news/{}", id), Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_banned_owner_loses_write_access_immediately() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (owner, charity_id) = app.verified_charity(&admin).await;
    let token = owner.tokens.access_token.as_str();

    let (status, _) = app.put(&format!("/api/admin/users/{}/ban", owner.user.id), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    // The access token is still unexpired.
    let (status, body) = app.create_campaign(token, &charity_id, "After the ban", 100.0).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Account is banned");

    let (status, _) = app.put("/api/charities/me", Some(token), json!({ "city": "Hue" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.put(&format!("/api/admin/users/{}/unban", owner.user.id), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.create_campaign(token, &charity_id, "Back in business", 100.0).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_deactivated_account_token_is_rejected() {
    let app = TestApp::new().await;
    let donor = app.signed_in(UserRole::Donor).await;
    let token = donor.tokens.access_token.as_str();

    let (status, _) = app.put("/api/users/deactivate", Some(token), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/users/profile", Some(token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Account is deactivated");
}
