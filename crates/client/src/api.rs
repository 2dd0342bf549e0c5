//! REST API client for the presensi HTTP endpoints.
//!
//! Wraps authentication, attendance submission and reporting using
//! [`reqwest`]. Every authenticated call takes the bearer token
//! explicitly so a request always carries the token that was current
//! when it was built.

use presensi_core::attendance::{AttendanceRecord, ReportResponse};
use presensi_core::capture::Capture;
use presensi_core::geo::Coordinate;
use presensi_core::report::ReportFilter;
use presensi_core::user::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
use serde::Serialize;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const CHECK_IN_PATH: &str = "/api/presensi/check-in";
pub const CHECK_OUT_PATH: &str = "/api/presensi/check-out";
pub const DAILY_REPORT_PATH: &str = "/api/reports/daily";

/// Multipart field carrying the selfie on check-in.
pub const PHOTO_FIELD: &str = "image";
/// File name attached to the selfie part.
pub const PHOTO_FILE_NAME: &str = "selfie.jpg";

/// HTTP client for one presensi backend.
pub struct PresensiApi {
    client: reqwest::Client,
    api_url: String,
}

/// Errors from the presensi REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error ({status}): {}", message.as_deref().unwrap_or("<no message>"))]
    Server {
        /// HTTP status code.
        status: u16,
        /// The `message` field of the error body, when there was one.
        message: Option<String>,
    },
}

impl ApiError {
    /// Text to show the user: the server's own message when it sent one,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// HTTP status for server-reported failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// JSON body of a check-out.
#[derive(Debug, Serialize)]
struct CheckOutBody {
    latitude: f64,
    longitude: f64,
}

impl PresensiApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://localhost:3001`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Exchange credentials for a token and profile.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(credentials)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Create an account. Returns the success status code.
    pub async fn register(&self, request: &RegisterRequest) -> Result<u16, ApiError> {
        let response = self
            .client
            .post(self.url(REGISTER_PATH))
            .json(request)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.status().as_u16())
    }

    /// Record a check-in.
    ///
    /// Sends a multipart `POST` with `latitude`, `longitude` and the
    /// capture as a JPEG file part.
    pub async fn check_in(
        &self,
        token: &str,
        coordinate: &Coordinate,
        capture: &Capture,
    ) -> Result<MessageResponse, ApiError> {
        let photo = reqwest::multipart::Part::bytes(capture.bytes().to_vec())
            .file_name(PHOTO_FILE_NAME)
            .mime_str(capture.content_type())?;

        let form = reqwest::multipart::Form::new()
            .text("latitude", coordinate.latitude().to_string())
            .text("longitude", coordinate.longitude().to_string())
            .part(PHOTO_FIELD, photo);

        let response = self
            .client
            .post(self.url(CHECK_IN_PATH))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Record a check-out. Sends the coordinate as JSON; no photo.
    pub async fn check_out(
        &self,
        token: &str,
        coordinate: &Coordinate,
    ) -> Result<MessageResponse, ApiError> {
        let body = CheckOutBody {
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
        };

        let response = self
            .client
            .post(self.url(CHECK_OUT_PATH))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// List attendance records matching `filter`. Absent criteria are not
    /// sent at all.
    pub async fn daily_report(
        &self,
        token: &str,
        filter: &ReportFilter,
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        let response = self
            .client
            .get(self.url(DAILY_REPORT_PATH))
            .bearer_auth(token)
            .query(filter)
            .send()
            .await?;

        let body: ReportResponse = Self::parse_response(response).await?;
        Ok(body.into_records())
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Ensure the response has a success status code. On failure, pulls
    /// the `message` field out of the error body if it has one.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<MessageResponse>(&body)
            .ok()
            .and_then(|b| b.message);

        tracing::debug!(status = status.as_u16(), body = %body, "API returned an error status");

        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
