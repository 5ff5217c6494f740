use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::error::ClientError;
use crate::domain::models::user::UserRole;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<SessionUser>,
}

/// Where a `Session` persists itself between process runs.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn load(&self) -> Result<Option<SessionData>, ClientError>;
    async fn save(&self, data: &SessionData) -> Result<(), ClientError>;
    async fn clear(&self) -> Result<(), ClientError>;
}

#[derive(Default)]
pub struct MemoryStorage {
    data: Mutex<Option<SessionData>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(data: SessionData) -> Self {
        Self { data: Mutex::new(Some(data)) }
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<SessionData>, ClientError> {
        Ok(self.data.lock().map(|d| d.clone()).unwrap_or_default())
    }

    async fn save(&self, data: &SessionData) -> Result<(), ClientError> {
        if let Ok(mut slot) = self.data.lock() {
            *slot = Some(data.clone());
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        if let Ok(mut slot) = self.data.lock() {
            *slot = None;
        }
        Ok(())
    }
}

/// Stores the session as a JSON document on disk.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStorage for JsonFileStorage {
    async fn load(&self) -> Result<Option<SessionData>, ClientError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&raw) {
            Ok(data) => Ok(Some(data)),
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    async fn save(&self, data: &SessionData) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_vec_pretty(data)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Holds the tokens and user of the signed-in account. Every change is
/// written through to the backing storage.
pub struct Session {
    storage: Arc<dyn SessionStorage>,
    data: RwLock<SessionData>,
}

impl Session {
    /// Restores whatever the storage holds; an empty storage gives a
    /// signed-out session.
    pub async fn load(storage: Arc<dyn SessionStorage>) -> Result<Self, ClientError> {
        let data = storage.load().await?.unwrap_or_default();
        debug!(authenticated = data.access_token.is_some(), "Session loaded");
        Ok(Self { storage, data: RwLock::new(data) })
    }

    pub fn in_memory() -> Self {
        Self {
            storage: Arc::new(MemoryStorage::new()),
            data: RwLock::new(SessionData::default()),
        }
    }

    pub async fn snapshot(&self) -> SessionData {
        self.data.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.data.read().await.access_token.clone()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.data.read().await.refresh_token.clone()
    }

    pub async fn user(&self) -> Option<SessionUser> {
        self.data.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.data.read().await.access_token.is_some()
    }

    pub async fn start(
        &self,
        access_token: String,
        refresh_token: String,
        user: SessionUser,
    ) -> Result<(), ClientError> {
        let mut data = self.data.write().await;
        *data = SessionData {
            access_token: Some(access_token),
            refresh_token: Some(refresh_token),
            user: Some(user),
        };
        self.storage.save(&data).await
    }

    pub async fn set_tokens(&self, access_token: String, refresh_token: String) -> Result<(), ClientError> {
        let mut data = self.data.write().await;
        data.access_token = Some(access_token);
        data.refresh_token = Some(refresh_token);
        self.storage.save(&data).await
    }

    pub async fn clear(&self) -> Result<(), ClientError> {
        let mut data = self.data.write().await;
        *data = SessionData::default();
        self.storage.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> SessionUser {
        SessionUser {
            id: "u1".into(),
            full_name: "Lan Pham".into(),
            email: "lan@example.com".into(),
            role: UserRole::Donor,
        }
    }

    #[tokio::test]
    async fn session_writes_through_to_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::load(storage.clone()).await.unwrap();
        assert!(!session.is_authenticated().await);

        session.start("a1".into(), "r1".into(), user()).await.unwrap();
        session.set_tokens("a2".into(), "r2".into()).await.unwrap();

        let stored = storage.load().await.unwrap().unwrap();
        assert_eq!(stored.access_token.as_deref(), Some("a2"));
        assert_eq!(stored.refresh_token.as_deref(), Some("r2"));
        assert_eq!(stored.user, Some(user()));

        session.clear().await.unwrap();
        assert!(storage.load().await.unwrap().is_none());
        assert_eq!(session.snapshot().await, SessionData::default());
    }

    #[tokio::test]
    async fn json_file_storage_survives_reload() {
        let path = std::env::temp_dir().join(format!("donatrust-session-{}.json", uuid::Uuid::new_v4()));
        let storage: Arc<dyn SessionStorage> = Arc::new(JsonFileStorage::new(&path));

        let session = Session::load(storage.clone()).await.unwrap();
        session.start("a1".into(), "r1".into(), user()).await.unwrap();

        let reloaded = Session::load(storage.clone()).await.unwrap();
        assert_eq!(reloaded.access_token().await.as_deref(), Some("a1"));
        assert_eq!(reloaded.user().await, Some(user()));

        reloaded.clear().await.unwrap();
        assert!(!path.exists());
    }
}
