//! Wiring of the shared client pieces.
//!
//! [`ClientContext`] owns the API client and the session store and hands
//! them to every component that needs them.

use std::sync::Arc;

use crate::api::PresensiApi;
use crate::auth::AuthService;
use crate::camera::{CameraDevice, PhotoCapturer};
use crate::config::ClientConfig;
use crate::geolocation::{GeolocationAcquirer, LocationProvider};
use crate::report::ReportView;
use crate::session::{SessionError, SessionStore};
use crate::store::{FileStore, KeyValueStore};
use crate::submitter::AttendanceSubmitter;

#[derive(Clone)]
pub struct ClientContext {
    pub config: Arc<ClientConfig>,
    pub api: Arc<PresensiApi>,
    pub sessions: Arc<SessionStore>,
}

impl ClientContext {
    /// Build a context whose session is persisted in `config.session_file`.
    pub async fn from_config(config: ClientConfig) -> Result<Self, SessionError> {
        let backend: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.session_file));
        Self::with_store(config, backend).await
    }

    /// Build a context on an arbitrary storage backend.
    pub async fn with_store(
        config: ClientConfig,
        backend: Arc<dyn KeyValueStore>,
    ) -> Result<Self, SessionError> {
        let api = Arc::new(PresensiApi::new(config.api_url.clone()));
        let sessions = Arc::new(SessionStore::load(backend).await?);
        Ok(Self {
            config: Arc::new(config),
            api,
            sessions,
        })
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.sessions.clone())
    }

    pub fn report_view(&self) -> ReportView {
        ReportView::new(self.api.clone(), self.sessions.clone())
    }

    /// An attendance workflow over the given platform capabilities.
    pub fn submitter(
        &self,
        location: Arc<dyn LocationProvider>,
        camera: Arc<dyn CameraDevice>,
    ) -> AttendanceSubmitter {
        AttendanceSubmitter::new(
            self.api.clone(),
            self.sessions.clone(),
            GeolocationAcquirer::new(location, self.config.location),
            PhotoCapturer::new(camera, self.config.capture),
        )
    }
}
