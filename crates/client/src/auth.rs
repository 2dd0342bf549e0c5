//! Login, registration and logout.

use std::sync::Arc;

use presensi_core::error::CoreError;
use presensi_core::messages::{LOGIN_FAILED, REGISTER_FAILED, REGISTER_SUCCEEDED};
use presensi_core::user::{LoginRequest, RegisterRequest, Session};

use crate::api::{ApiError, PresensiApi};
use crate::session::{SessionError, SessionStore};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// The server answered 2xx but not with a status the form treats as
    /// success.
    #[error("Unexpected status {0}")]
    UnexpectedStatus(u16),
}

impl AuthError {
    /// Text to show the user for a failed auth action.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AuthError::Validation(CoreError::Validation(msg)) => msg.clone(),
            AuthError::Api(e) => e.user_message(fallback),
            _ => fallback.to_string(),
        }
    }
}

pub struct AuthService {
    api: Arc<PresensiApi>,
    sessions: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(api: Arc<PresensiApi>, sessions: Arc<SessionStore>) -> Self {
        Self { api, sessions }
    }

    /// Log in and make the returned identity the active session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self.api.login(&credentials).await.map_err(|e| {
            tracing::warn!(email = %email, error = %e, "Login failed");
            e
        })?;

        let session = Session::from(response);
        self.sessions.login(session.clone()).await?;
        Ok(session)
    }

    /// [`login`](Self::login), with failures already turned into the text
    /// the login form shows.
    pub async fn login_message(&self, email: &str, password: &str) -> Result<Session, String> {
        self.login(email, password)
            .await
            .map_err(|e| e.user_message(LOGIN_FAILED))
    }

    /// Validate locally, then create the account. 200 and 201 count as
    /// success; the returned text is the confirmation to show.
    pub async fn register(&self, request: &RegisterRequest) -> Result<String, AuthError> {
        request.check()?;

        let status = self.api.register(request).await.map_err(|e| {
            tracing::warn!(email = %request.email, error = %e, "Registration failed");
            e
        })?;

        match status {
            200 | 201 => {
                tracing::info!(email = %request.email, role = %request.role, "Registered");
                Ok(REGISTER_SUCCEEDED.to_string())
            }
            other => Err(AuthError::UnexpectedStatus(other)),
        }
    }

    /// [`register`](Self::register), with failures turned into form text.
    pub async fn register_message(&self, request: &RegisterRequest) -> Result<String, String> {
        self.register(request)
            .await
            .map_err(|e| e.user_message(REGISTER_FAILED))
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        self.sessions.logout().await?;
        Ok(())
    }
}
