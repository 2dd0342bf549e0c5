//! Authenticated identity: user profile, session, and the login and
//! registration payloads exchanged with the auth endpoints.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::roles::{DEFAULT_ROLE, VALID_ROLES};
use crate::types::DbId;

/// Profile of the logged-in user as returned by `/api/auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    #[serde(default)]
    pub nama: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

/// An authenticated identity: the opaque bearer token plus the profile
/// that came with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

impl Session {
    pub fn new(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Session::new(resp.token, resp.user)
    }
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Nama tidak boleh kosong"))]
    pub nama: String,

    #[validate(email(message = "Format email tidak valid"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password tidak boleh kosong"))]
    pub password: String,

    #[validate(custom(function = "validate_role"))]
    pub role: String,
}

impl RegisterRequest {
    /// Build a registration with the default role.
    pub fn new(nama: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            nama: nama.into(),
            email: email.into(),
            password: password.into(),
            role: DEFAULT_ROLE.to_string(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Run field validation and flatten the result into a [`CoreError`].
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))
    }
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_role"))
    }
}

/// The `{message}` envelope used by the attendance endpoints and by error
/// responses across the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn login_response_becomes_session() {
        let json = r#"{"token":"abc123","user":{"id":7,"nama":"Budi","email":"budi@kampus.ac.id","role":"mahasiswa"}}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        let session = Session::from(resp);
        assert_eq!(session.token, "abc123");
        assert_eq!(session.user.nama, "Budi");
        assert_eq!(session.user.id, Some(7));
        assert_eq!(session.bearer(), "Bearer abc123");
    }

    #[test]
    fn profile_tolerates_missing_fields() {
        let user: UserProfile = serde_json::from_str(r#"{"email":"a@b.id"}"#).unwrap();
        assert_eq!(user.nama, "");
        assert_eq!(user.role, "");
        assert_eq!(user.id, None);
    }

    #[test]
    fn register_defaults_to_mahasiswa() {
        let req = RegisterRequest::new("Budi", "budi@kampus.ac.id", "rahasia");
        assert_eq!(req.role, "mahasiswa");
        assert!(req.check().is_ok());
    }

    #[test]
    fn register_rejects_bad_email() {
        let req = RegisterRequest::new("Budi", "bukan-email", "rahasia");
        assert_matches!(req.check(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn register_rejects_empty_name_and_password() {
        assert!(RegisterRequest::new("", "budi@kampus.ac.id", "x").check().is_err());
        assert!(RegisterRequest::new("Budi", "budi@kampus.ac.id", "").check().is_err());
    }

    #[test]
    fn register_rejects_unknown_role() {
        let req = RegisterRequest::new("Budi", "budi@kampus.ac.id", "x").with_role("root");
        assert_matches!(req.check(), Err(CoreError::Validation(_)));
        let admin = RegisterRequest::new("Ani", "ani@kampus.ac.id", "x").with_role("admin");
        assert!(admin.check().is_ok());
    }

    #[test]
    fn register_serializes_server_field_names() {
        let req = RegisterRequest::new("Budi", "budi@kampus.ac.id", "x");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["nama"], "Budi");
        assert_eq!(json["role"], "mahasiswa");
    }

    #[test]
    fn message_response_without_message() {
        let resp: MessageResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.message.is_none());
    }
}
