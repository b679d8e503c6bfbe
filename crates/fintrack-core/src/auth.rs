//! Authentication state
//!
//! [`AuthContext`] is the only owner of the session. The web shell reads it
//! for route gating and the HTTP client reads it for the bearer token.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::error::{CoreError, CoreResult};

/// Token store reference type
pub type TokenStoreRef = Arc<dyn TokenStore>;

/// Durable storage for the bearer token
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the stored token, if any
    async fn load(&self) -> CoreResult<Option<String>>;

    /// Replace the stored token
    async fn save(&self, token: &str) -> CoreResult<()>;

    /// Remove the stored token; clearing an empty store is not an error
    async fn clear(&self) -> CoreResult<()>;
}

/// Token kept in a single file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> CoreResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let token = content.trim();
                Ok(if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, token: &str) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, token).await?;
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Token kept in memory, for tests and throw-away sessions
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> CoreResult<Option<String>> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &str) -> CoreResult<()> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        *self.token.write().await = None;
        Ok(())
    }
}

/// Snapshot of the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub token: Option<String>,
    /// Email entered at login, shown in the header
    pub user: Option<String>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Shared authentication context
#[derive(Clone)]
pub struct AuthContext {
    state: Arc<RwLock<AuthState>>,
    store: TokenStoreRef,
}

impl AuthContext {
    /// Unauthenticated context backed by `store`
    pub fn new(store: TokenStoreRef) -> Self {
        Self {
            state: Arc::new(RwLock::new(AuthState::default())),
            store,
        }
    }

    /// Context rehydrated from whatever token `store` holds
    pub async fn restore(store: TokenStoreRef) -> CoreResult<Self> {
        let token = store.load().await?;
        if token.is_some() {
            log::info!("Restored session from token store");
        }
        Ok(Self {
            state: Arc::new(RwLock::new(AuthState { token, user: None })),
            store,
        })
    }

    /// Persist the token, then mark the session authenticated
    pub async fn login(&self, token: &str, user: Option<String>) -> CoreResult<()> {
        if token.is_empty() {
            return Err(CoreError::Unauthorized);
        }
        self.store.save(token).await?;
        let mut state = self.state.write().await;
        state.token = Some(token.to_string());
        state.user = user;
        Ok(())
    }

    /// Drop the session. In-memory state is cleared even if storage fails.
    pub async fn logout(&self) -> CoreResult<()> {
        {
            let mut state = self.state.write().await;
            *state = AuthState::default();
        }
        self.store.clear().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    pub async fn user(&self) -> Option<String> {
        self.state.read().await.user.clone()
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext").finish_non_exhaustive()
    }
}
