use donatrust_backend::{
    api::router::create_router,
    config::Config,
    domain::models::user::{User, UserRole},
    domain::services::auth_service::hash_password,
    infra::factory::sqlite_repositories,
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::{json, Value};

pub const TEST_PASSWORD: &str = "s3cret-pass";

pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[allow(dead_code)]
pub struct TestUser {
    pub user: User,
    pub tokens: Tokens,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub upload_dir: PathBuf,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let upload_dir = std::env::temp_dir().join(format!("donatrust-uploads-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&upload_dir).expect("Failed to create upload dir");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            access_token_ttl_minutes: 15,
            refresh_token_ttl_days: 7,
            upload_dir: upload_dir.to_string_lossy().to_string(),
            admin_email: None,
            admin_password: None,
        };

        let state = Arc::new(AppState::new(config, sqlite_repositories(pool.clone())));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            upload_dir,
            state,
        }
    }

    /// Sends a JSON request and returns the status with the parsed body
    /// (`Value::Null` for empty or non-JSON bodies).
    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Inserts a user straight into the repository; the only way to get an
    /// admin, since the API refuses admin self-registration.
    pub async fn create_user(&self, role: UserRole) -> User {
        let email = format!("{}-{}@donatrust.test", role, Uuid::new_v4());
        let hash = hash_password(TEST_PASSWORD).unwrap();
        let user = User::new(format!("Test {}", role), email, None, hash, role);
        self.state.user_repo.create(&user).await.unwrap()
    }

    pub async fn login(&self, email: &str, password: &str) -> Tokens {
        let (status, body) = self.post(
            "/api/auth/login",
            None,
            json!({ "email": email, "password": password }),
        ).await;

        if !status.is_success() {
            panic!("Login failed in test helper: status {} body {}", status, body);
        }

        Tokens {
            access_token: body["accessToken"].as_str().expect("No accessToken in body").to_string(),
            refresh_token: body["refreshToken"].as_str().expect("No refreshToken in body").to_string(),
        }
    }

    pub async fn signed_in(&self, role: UserRole) -> TestUser {
        let user = self.create_user(role).await;
        let tokens = self.login(&user.email, TEST_PASSWORD).await;
        TestUser { user, tokens }
    }

    pub async fn admin_token(&self) -> String {
        self.signed_in(UserRole::Admin).await.tokens.access_token
    }

    /// Registers a charity for a fresh charity account. Returns the owner
    /// and the charity id; the charity stays pending.
    pub async fn pending_charity(&self, license_number: &str) -> (TestUser, String) {
        let owner = self.signed_in(UserRole::Charity).await;
        let (status, body) = self.post(
            "/api/charities/register",
            Some(&owner.tokens.access_token),
            json!({
                "name": format!("Charity {}", license_number),
                "license_number": license_number,
                "city": "Hanoi",
                "bank_account": "VCB-0011223344",
            }),
        ).await;
        assert_eq!(status, StatusCode::CREATED, "charity registration failed: {}", body);

        let id = body["id"].as_str().expect("No charity id").to_string();
        (owner, id)
    }

    pub async fn verified_charity(&self, admin_token: &str) -> (TestUser, String) {
        let (owner, id) = self.pending_charity(&format!("LIC-{}", Uuid::new_v4())).await;
        let (status, body) = self.put(
            &format!("/api/admin/charities/{}/verify", id),
            Some(admin_token),
            json!({ "status": "verified" }),
        ).await;
        assert_eq!(status, StatusCode::OK, "charity verification failed: {}", body);
        (owner, id)
    }

    pub async fn create_campaign(&self, token: &str, charity_id: &str, title: &str, goal_amount: f64) -> (StatusCode, Value) {
        self.post(
            "/api/campaigns",
            Some(token),
            json!({
                "charity_id": charity_id,
                "title": title,
                "description": "Clean water for every village",
                "goal_amount": goal_amount,
                "category": "environment",
            }),
        ).await
    }

    /// Creates a campaign and has an admin approve it.
    pub async fn active_campaign(&self, owner_token: &str, admin_token: &str, charity_id: &str, title: &str) -> String {
        let (status, body) = self.create_campaign(owner_token, charity_id, title, 1000.0).await;
        assert_eq!(status, StatusCode::CREATED, "campaign creation failed: {}", body);
        let id = body["id"].as_str().expect("No campaign id").to_string();

        let (status, body) = self.put(&format!("/api/admin/campaigns/{}/approve", id), Some(admin_token), json!({})).await;
        assert_eq!(status, StatusCode::OK, "campaign approval failed: {}", body);
        id
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}
