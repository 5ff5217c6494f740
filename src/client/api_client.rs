use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::error::ClientError;
use super::session::{Session, SessionUser};
use crate::domain::models::user::UserRole;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const REGISTER_PATH: &str = "/api/auth/register";
const LOGIN_PATH: &str = "/api/auth/login";
const REFRESH_PATH: &str = "/api/auth/refresh-token";
const LOGOUT_PATH: &str = "/api/auth/logout";

#[derive(Debug, Clone, Serialize)]
pub struct RegisterParams {
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
    user: SessionUser,
}

struct Outgoing<'a> {
    method: Method,
    path: &'a str,
    query: &'a [(&'static str, String)],
    body: Option<&'a Value>,
}

/// Authenticated JSON client.
///
/// Each request carries the session's access token. A 401 triggers a single
/// refresh exchange followed by a single replay; a failed refresh clears the
/// session and surfaces the original 401.
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<Session>,
    refresh_lock: Mutex<()>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<Session>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // --- Auth ---

    pub async fn register(&self, params: &RegisterParams) -> Result<SessionUser, ClientError> {
        #[derive(Deserialize)]
        struct Registered {
            user: SessionUser,
        }

        let registered: Registered = self.anonymous(REGISTER_PATH, &serde_json::to_value(params)?).await?;
        Ok(registered.user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ClientError> {
        let res: LoginResponse = self
            .anonymous(LOGIN_PATH, &json!({ "email": email, "password": password }))
            .await?;

        let user = res.user;
        self.session.start(res.access_token, res.refresh_token, user.clone()).await?;
        info!(user_id = %user.id, "Logged in");
        Ok(user)
    }

    /// Revokes the refresh token server-side. The local session is cleared
    /// even when the server call fails.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let revoked = match self.session.refresh_token().await {
            Some(token) => self
                .anonymous::<Value>(LOGOUT_PATH, &json!({ "refreshToken": token }))
                .await
                .map(|_| ()),
            None => Ok(()),
        };

        self.session.clear().await?;
        revoked
    }

    // --- Verbs ---

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(Method::GET, path, &[], None).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ClientError> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, &[], Some(&body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, path, &[], Some(&body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(Method::DELETE, path, &[], None).await
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&Value>,
    ) -> Result<T, ClientError> {
        let outgoing = Outgoing { method, path, query, body };

        let (response, used_token) = self.dispatch(&outgoing).await?;
        if response.status() != StatusCode::UNAUTHORIZED || self.session.refresh_token().await.is_none() {
            return decode(response).await;
        }

        let original = ClientError::from_response(response).await;
        debug!(path, "Access token rejected, refreshing session");

        if let Err(e) = self.refresh_after(used_token.as_deref()).await {
            warn!("Session refresh failed: {}", e);
            self.session.clear().await?;
            return Err(original);
        }

        // The replay is final; a second 401 goes straight back to the caller.
        let (replayed, _) = self.dispatch(&outgoing).await?;
        decode(replayed).await
    }

    async fn dispatch(&self, outgoing: &Outgoing<'_>) -> Result<(Response, Option<String>), ClientError> {
        let token = self.session.access_token().await;

        let mut builder = self.http.request(outgoing.method.clone(), self.url(outgoing.path));
        if !outgoing.query.is_empty() {
            builder = builder.query(outgoing.query);
        }
        if let Some(body) = outgoing.body {
            builder = builder.json(body);
        }
        if let Some(token) = &token {
            builder = builder.bearer_auth(token);
        }

        Ok((builder.send().await?, token))
    }

    /// Exchanges the refresh token unless another request already replaced
    /// the access token this one was rejected with.
    async fn refresh_after(&self, stale: Option<&str>) -> Result<(), ClientError> {
        let _guard = self.refresh_lock.lock().await;

        if self.session.access_token().await.as_deref() != stale {
            return Ok(());
        }

        let refresh_token = self.session.refresh_token().await.ok_or(ClientError::NotAuthenticated)?;
        let tokens: TokenResponse = self
            .anonymous(REFRESH_PATH, &json!({ "refreshToken": refresh_token }))
            .await?;

        self.session.set_tokens(tokens.access_token, tokens.refresh_token).await?;
        info!("Session refreshed");
        Ok(())
    }

    async fn anonymous<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, ClientError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::from_response(response).await);
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
