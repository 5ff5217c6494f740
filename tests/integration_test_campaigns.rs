mod common;

use axum::http::StatusCode;
use common::TestApp;
use donatrust_backend::domain::models::user::UserRole;
use serde_json::json;

#[tokio::test]
async fn test_listing_respects_limit_and_reports_total() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (owner, charity_id) = app.verified_charity(&admin).await;

    for i in 0..5 {
        app.active_campaign(&owner.tokens.access_token, &admin, &charity_id, &format!("Well #{}", i)).await;
    }
    // Pending campaigns stay out of the public listing.
    app.create_campaign(&owner.tokens.access_token, &charity_id, "Not yet approved", 10.0).await;

    let (status, body) = app.get("/api/campaigns?page=1&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["campaigns"].as_array().unwrap().len(), 2);
    assert_eq!(body["total"], 5);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["totalPages"], 3);

    let (_, body) = app.get("/api/campaigns?page=3&limit=2", None).await;
    assert_eq!(body["campaigns"].as_array().unwrap().len(), 1);
    assert_eq!(body["total"], 5);

    let (_, body) = app.get("/api/campaigns?search=%233", None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["campaigns"][0]["title"], "Well #3");

    let (_, body) = app.get("/api/campaigns?category=education", None).await;
    assert_eq!(body["total"], 0);

    let (status, _) = app.get("/api/campaigns?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_campaigns_of_unverified_charities_are_hidden() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (owner, charity_id) = app.pending_charity("LIC-PENDING").await;

    app.active_campaign(&owner.tokens.access_token, &admin, &charity_id, "Hidden").await;

    let (_, body) = app.get("/api/campaigns", None).await;
    assert_eq!(body["total"], 0);

    let (_, body) = app.get("/api/admin/campaigns", Some(&admin)).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_goal_amount_validation() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (owner, charity_id) = app.verified_charity(&admin).await;
    let token = owner.tokens.access_token.as_str();

    let (status, body) = app.create_campaign(token, &charity_id, "Negative", -1.0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "goal_amount");

    let (status, body) = app.create_campaign(token, &charity_id, "Zero", 0.0).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["goal_amount"], 0.0);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["current_amount"], 0.0);

    let (status, body) = app.post("/api/campaigns", Some(token), json!({ "description": "no title" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);

    let (status, body) = app.post("/api/campaigns", Some(token), json!({
        "charity_id": charity_id,
        "title": "Bad category",
        "goal_amount": 100,
        "category": "crypto",
    })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "category");

    let (status, body) = app.post("/api/campaigns", Some(token), json!({
        "charity_id": charity_id,
        "title": "Backwards",
        "goal_amount": 100,
        "start_date": "2026-05-01T00:00:00Z",
        "end_date": "2026-04-01T00:00:00Z",
    })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "end_date");

    let (status, _) = app.create_campaign(token, "no-such-charity", "Orphan", 5.0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_detail_updates_and_not_found() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (owner, charity_id) = app.verified_charity(&admin).await;
    let id = app.active_campaign(&owner.tokens.access_token, &admin, &charity_id, "School roof").await;

    let (status, body) = app.post(
        &format!("/api/campaigns/{}/updates", id),
        Some(&owner.tokens.access_token),
        json!({ "title": "Tiles bought", "content": "Half of the tiles are on site." }),
    ).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["campaign_id"], id.as_str());

    let (status, body) = app.get(&format!("/api/campaigns/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "School roof");
    assert_eq!(body["charity"]["id"], charity_id.as_str());
    assert!(body["charity"].get("bank_account").is_none());
    assert_eq!(body["progress_updates"].as_array().unwrap().len(), 1);

    let (status, body) = app.get("/api/campaigns/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_only_owner_or_admin_may_modify() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (owner, charity_id) = app.verified_charity(&admin).await;
    let (intruder, _) = app.verified_charity(&admin).await;
    let donor = app.signed_in(UserRole::Donor).await;
    let id = app.active_campaign(&owner.tokens.access_token, &admin, &charity_id, "Clinic").await;

    let (status, _) = app.create_campaign(&donor.tokens.access_token, &charity_id, "Hijack", 10.0).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/api/campaigns/{}", id);
    let (status, _) = app.put(&uri, Some(&intruder.tokens.access_token), json!({ "title": "Mine now" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete(&uri, Some(&intruder.tokens.access_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.put(&uri, Some(&owner.tokens.access_token), json!({ "title": "Clinic v2", "goal_amount": 2500 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Clinic v2");
    assert_eq!(body["goal_amount"], 2500.0);

    let (status, _) = app.delete(&uri, Some(&owner.tokens.access_token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_featured_and_categories() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (owner, charity_id) = app.verified_charity(&admin).await;
    let first = app.active_campaign(&owner.tokens.access_token, &admin, &charity_id, "Trees").await;
    app.active_campaign(&owner.tokens.access_token, &admin, &charity_id, "Rivers").await;

    // Featuring is an admin decision.
    let (status, _) = app.put(
        &format!("/api/campaigns/{}", first),
        Some(&owner.tokens.access_token),
        json!({ "featured": true }),
    ).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.put(&format!("/api/campaigns/{}", first), Some(&admin), json!({ "featured": true })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["featured"], true);

    let (status, body) = app.get("/api/campaigns/featured", None).await;
    assert_eq!(status, StatusCode::OK);
    let featured = body["campaigns"].as_array().unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0]["id"], first.as_str());
    assert_eq!(body["total"], 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 6);
    assert_eq!(body["totalPages"], 1);

    let (_, body) = app.get("/api/campaigns?featured=true", None).await;
    assert_eq!(body["total"], 1);

    let (status, body) = app.get("/api/campaigns/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let categories = body.as_array().unwrap();
    assert_eq!(categories.len(), 10);
    assert!(categories.iter().any(|c| c["id"] == "education"));
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (owner, charity_id) = app.verified_charity(&admin).await;
    app.active_campaign(&owner.tokens.access_token, &admin, &charity_id, "100% clean water").await;
    app.active_campaign(&owner.tokens.access_token, &admin, &charity_id, "School meals").await;

    let (status, body) = app.get("/api/campaigns?search=%25", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["campaigns"][0]["title"], "100% clean water");

    let (_, body) = app.get("/api/campaigns?search=_", None).await;
    assert_eq!(body["total"], 0);

    let (_, body) = app.get("/api/admin/users?search=%25", Some(&admin)).await;
    assert_eq!(body["total"], 0);

    let (_, body) = app.get("/api/charities?search=_", None).await;
    assert_eq!(body["total"], 0);
}
