//! Session ownership.
//!
//! [`SessionStore`] is the single owner of the authenticated identity:
//! login writes it, logout clears it, and every component that needs a
//! bearer token is handed an `Arc<SessionStore>` instead of reading
//! storage on its own. Two entries are persisted: `token` and `user`
//! (the JSON-encoded profile).

use std::sync::Arc;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use presensi_core::types::DbId;
use presensi_core::user::{Session, UserProfile};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::store::{KeyValueStore, StoreError};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Stored profile is unreadable: {0}")]
    Profile(#[from] serde_json::Error),

    #[error("Token is not a readable JWT: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Claims the backend embeds in its tokens. All optional: the client
/// only reads them for display.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub id: Option<DbId>,
    #[serde(default)]
    pub nama: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Read the payload of a JWT without verifying its signature.
///
/// The signing secret lives on the server; this is for showing the
/// role and name carried by the token, never for authorization.
pub fn decode_claims(token: &str) -> Result<TokenClaims, SessionError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// A store with no active session.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            current: RwLock::new(None),
        }
    }

    /// Restore the persisted session, if any.
    ///
    /// Both entries must be present and the profile must parse. Anything
    /// less, including damaged storage, counts as logged out so that a
    /// fresh login can overwrite it. Only I/O failures are returned.
    pub async fn load(backend: Arc<dyn KeyValueStore>) -> Result<Self, SessionError> {
        let current = match Self::read_persisted(backend.as_ref()).await {
            Ok(current) => current,
            Err(SessionError::Store(StoreError::Io(e))) => return Err(StoreError::Io(e).into()),
            Err(e) => {
                tracing::warn!(error = %e, "Persisted session is unreadable, starting logged out");
                None
            }
        };

        Ok(Self {
            backend,
            current: RwLock::new(current),
        })
    }

    async fn read_persisted(backend: &dyn KeyValueStore) -> Result<Option<Session>, SessionError> {
        let token = backend.get(TOKEN_KEY).await?;
        let user = backend.get(USER_KEY).await?;

        match (token, user) {
            (Some(token), Some(user)) if !token.is_empty() => {
                let profile: UserProfile = serde_json::from_str(&user)?;
                tracing::debug!(email = %profile.email, "Restored persisted session");
                Ok(Some(Session::new(token, profile)))
            }
            _ => Ok(None),
        }
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// Bearer token of the active session.
    pub async fn token(&self) -> Option<String> {
        self.current.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.current.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Persist and activate a session.
    pub async fn login(&self, session: Session) -> Result<(), SessionError> {
        let user = serde_json::to_string(&session.user)?;
        self.backend.set(TOKEN_KEY, &session.token).await?;
        self.backend.set(USER_KEY, &user).await?;

        tracing::info!(email = %session.user.email, role = %session.user.role, "Session started");
        *self.current.write().await = Some(session);
        Ok(())
    }

    /// Clear both the active and the persisted session.
    pub async fn logout(&self) -> Result<(), SessionError> {
        *self.current.write().await = None;
        self.backend.remove(TOKEN_KEY).await?;
        self.backend.remove(USER_KEY).await?;
        tracing::info!("Session cleared");
        Ok(())
    }
}
