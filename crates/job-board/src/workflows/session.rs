//! Mock authentication and the single persisted record: the signed-in user.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::WorkflowConfig;
use crate::workflows::moderation::domain::UserRole;

pub const AVATAR_PLACEHOLDER: &str = "/placeholder.svg?height=32&width=32";

const LOGIN_DELAY: Duration = Duration::from_millis(1000);
const REGISTER_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session record i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session record could not be encoded: {0}")]
    Json(#[from] serde_json::Error),
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Where the signed-in user survives a reload.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<SessionUser>, SessionError>;
    fn save(&self, user: &SessionUser) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// JSON file holding at most one record.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionUser>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        // An undecodable record reads as signed out.
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(error) => {
                warn!(path = %self.path.display(), %error, "ignoring unreadable session record");
                Ok(None)
            }
        }
    }

    fn save(&self, user: &SessionUser) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(user)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    record: Arc<Mutex<Option<SessionUser>>>,
}

impl MemorySessionStore {
    fn record(&self) -> Result<std::sync::MutexGuard<'_, Option<SessionUser>>, SessionError> {
        self.record
            .lock()
            .map_err(|_| SessionError::Unavailable("session mutex poisoned".to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionUser>, SessionError> {
        Ok(self.record()?.clone())
    }

    fn save(&self, user: &SessionUser) -> Result<(), SessionError> {
        *self.record()? = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.record()? = None;
        Ok(())
    }
}

/// Accepts any credentials after a simulated round trip.
pub struct AuthService<S> {
    store: Arc<S>,
    config: WorkflowConfig,
}

impl<S> AuthService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(store: Arc<S>, config: WorkflowConfig) -> Self {
        Self { store, config }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<SessionUser, SessionError> {
        tokio::time::sleep(self.config.scaled(LOGIN_DELAY)).await;

        let name = request
            .email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string();
        let user = SessionUser {
            id: "1".to_string(),
            name,
            email: request.email,
            role: request.role,
            avatar: Some(AVATAR_PLACEHOLDER.to_string()),
        };

        self.store.save(&user)?;
        info!(email = %user.email, role = user.role.label(), "signed in");
        Ok(user)
    }

    pub async fn register(&self, request: RegistrationRequest) -> Result<SessionUser, SessionError> {
        tokio::time::sleep(self.config.scaled(REGISTER_DELAY)).await;

        let user = SessionUser {
            id: Utc::now().timestamp_millis().to_string(),
            name: format!("{} {}", request.first_name, request.last_name),
            email: request.email,
            role: request.role,
            avatar: None,
        };

        self.store.save(&user)?;
        info!(email = %user.email, role = user.role.label(), "registered");
        Ok(user)
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.store.clear()?;
        info!("signed out");
        Ok(())
    }

    pub fn current(&self) -> Result<Option<SessionUser>, SessionError> {
        self.store.load()
    }
}
