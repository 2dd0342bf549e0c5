//! Attendance submission: location, photo, authenticated request,
//! response handling.
//!
//! [`AttendanceSubmitter`] drives [`WorkflowState`] against the
//! geolocation acquirer, the photo capturer and the API. The state lock
//! is never held across a network call; entering `Submitting` under the
//! lock is what keeps a second submission out. After
//! [`dispose`](AttendanceSubmitter::dispose), late results are dropped
//! instead of being applied.

use std::sync::Arc;

use presensi_core::geo::Coordinate;
use presensi_core::messages::{CHECK_IN_FAILED, CHECK_OUT_FAILED};
use presensi_core::user::MessageResponse;
use presensi_core::workflow::{Phase, Precondition, SubmissionKind, WorkflowState};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, PresensiApi};
use crate::camera::{CameraError, PhotoCapturer, PreviewState};
use crate::geolocation::GeolocationAcquirer;
use crate::session::SessionStore;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// The action is unavailable right now; no request was sent.
    #[error(transparent)]
    Precondition(#[from] Precondition),

    /// No active session; the caller should send the user to login.
    #[error("Not logged in")]
    Unauthenticated,

    #[error(transparent)]
    Camera(#[from] CameraError),

    /// The submitter was disposed; the result was discarded.
    #[error("Workflow disposed")]
    Disposed,
}

/// What a finished submission surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Succeeded(String),
    Failed(String),
}

impl SubmissionOutcome {
    pub fn message(&self) -> &str {
        match self {
            SubmissionOutcome::Succeeded(m) | SubmissionOutcome::Failed(m) => m,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Succeeded(_))
    }
}

/// Read-only view of the workflow for rendering.
#[derive(Debug, Clone)]
pub struct WorkflowSnapshot {
    pub phase: Phase,
    pub coordinate: Option<Coordinate>,
    pub has_capture: bool,
    pub preview: PreviewState,
    pub location_error: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub busy: bool,
    pub locating: bool,
    pub can_check_in: bool,
    pub can_check_out: bool,
}

pub struct AttendanceSubmitter {
    api: Arc<PresensiApi>,
    sessions: Arc<SessionStore>,
    geolocation: GeolocationAcquirer,
    camera: PhotoCapturer,
    state: Mutex<WorkflowState>,
    cancel: CancellationToken,
}

impl AttendanceSubmitter {
    pub fn new(
        api: Arc<PresensiApi>,
        sessions: Arc<SessionStore>,
        geolocation: GeolocationAcquirer,
        camera: PhotoCapturer,
    ) -> Self {
        Self {
            api,
            sessions,
            geolocation,
            camera,
            state: Mutex::new(WorkflowState::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Start the camera preview and request the first location fix.
    ///
    /// Platform failures do not abort initialization; they are reflected
    /// in the snapshot and keep the dependent actions unavailable.
    pub async fn initialize(&self) -> Result<WorkflowSnapshot, WorkflowError> {
        self.ensure_live()?;

        if let Err(e) = self.camera.start().await {
            tracing::warn!(error = %e, "Camera unavailable, check-in will stay disabled");
        }
        self.locate().await?;
        Ok(self.snapshot().await)
    }

    /// Request a fresh location fix, superseding any earlier one.
    pub async fn locate(&self) -> Result<(), WorkflowError> {
        self.ensure_live()?;
        self.state.lock().await.begin_locating()?;

        let acquisition = tokio::select! {
            _ = self.cancel.cancelled() => return Err(WorkflowError::Disposed),
            acq = self.geolocation.acquire() => acq,
        };

        if !self.geolocation.is_current(acquisition.generation) {
            tracing::debug!(
                generation = acquisition.generation,
                "Discarding superseded location result",
            );
            return Ok(());
        }

        self.ensure_live()?;
        self.state
            .lock()
            .await
            .resolve_location(acquisition.result);
        Ok(())
    }

    /// Freeze the current camera frame as the check-in photo.
    pub async fn capture_photo(&self) -> Result<(), WorkflowError> {
        self.ensure_live()?;
        if self.state.lock().await.is_busy() {
            return Err(Precondition::Busy.into());
        }

        let capture = self.camera.capture().await?;
        let stored = self.state.lock().await.set_capture(capture);
        if let Err(e) = stored {
            self.camera.resume().await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Discard the photo and resume the live preview.
    pub async fn retake_photo(&self) -> Result<(), WorkflowError> {
        self.ensure_live()?;
        self.state.lock().await.clear_capture()?;
        self.camera.resume().await;
        Ok(())
    }

    /// Submit a check-in with the current coordinate and photo.
    pub async fn check_in(&self) -> Result<SubmissionOutcome, WorkflowError> {
        self.ensure_live()?;
        let token = self
            .sessions
            .token()
            .await
            .ok_or(WorkflowError::Unauthenticated)?;

        let (coordinate, capture) = self.state.lock().await.begin_check_in()?;

        tracing::info!(
            latitude = coordinate.latitude(),
            longitude = coordinate.longitude(),
            photo_bytes = capture.len(),
            "Submitting check-in",
        );

        let result = tokio::select! {
            _ = self.cancel.cancelled() => return Err(WorkflowError::Disposed),
            r = self.api.check_in(&token, &coordinate, &capture) => r,
        };

        self.finish(SubmissionKind::CheckIn, result).await
    }

    /// Submit a check-out with the current coordinate. No photo needed.
    pub async fn check_out(&self) -> Result<SubmissionOutcome, WorkflowError> {
        self.ensure_live()?;
        let token = self
            .sessions
            .token()
            .await
            .ok_or(WorkflowError::Unauthenticated)?;

        let coordinate = self.state.lock().await.begin_check_out()?;

        tracing::info!(
            latitude = coordinate.latitude(),
            longitude = coordinate.longitude(),
            "Submitting check-out",
        );

        let result = tokio::select! {
            _ = self.cancel.cancelled() => return Err(WorkflowError::Disposed),
            r = self.api.check_out(&token, &coordinate) => r,
        };

        self.finish(SubmissionKind::CheckOut, result).await
    }

    /// Dismiss the displayed outcome.
    pub async fn acknowledge(&self) {
        self.state.lock().await.acknowledge();
    }

    pub async fn snapshot(&self) -> WorkflowSnapshot {
        let preview = self.camera.preview_state().await;
        let state = self.state.lock().await;
        WorkflowSnapshot {
            phase: state.phase(),
            coordinate: state.coordinate().copied(),
            has_capture: state.capture().is_some(),
            preview,
            location_error: state.location_error().map(|e| e.to_string()),
            message: state.message().map(str::to_string),
            error: state.error().map(str::to_string),
            busy: state.is_busy(),
            locating: state.is_locating(),
            can_check_in: state.can_check_in(),
            can_check_out: state.can_check_out(),
        }
    }

    /// Tear down: any result arriving afterwards is ignored.
    pub fn dispose(&self) {
        tracing::debug!("Attendance workflow disposed");
        self.cancel.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn ensure_live(&self) -> Result<(), WorkflowError> {
        if self.cancel.is_cancelled() {
            Err(WorkflowError::Disposed)
        } else {
            Ok(())
        }
    }

    async fn finish(
        &self,
        kind: SubmissionKind,
        result: Result<MessageResponse, ApiError>,
    ) -> Result<SubmissionOutcome, WorkflowError> {
        // Disposed while the response was being read.
        self.ensure_live()?;

        let outcome = match result {
            Ok(body) => {
                let message = body.message.unwrap_or_default();
                tracing::info!(action = kind.as_str(), message = %message, "Submission accepted");
                SubmissionOutcome::Succeeded(message)
            }
            Err(e) => {
                let fallback = match kind {
                    SubmissionKind::CheckIn => CHECK_IN_FAILED,
                    SubmissionKind::CheckOut => CHECK_OUT_FAILED,
                };
                tracing::warn!(action = kind.as_str(), error = %e, "Submission failed");
                SubmissionOutcome::Failed(e.user_message(fallback))
            }
        };

        {
            let mut state = self.state.lock().await;
            let result = match &outcome {
                SubmissionOutcome::Succeeded(m) => Ok(m.clone()),
                SubmissionOutcome::Failed(m) => Err(m.clone()),
            };
            state.finish_submission(kind, result);
        }

        if outcome.is_success() {
            // The photo was consumed; the next check-in needs a new one.
            self.camera.resume().await;
        }

        Ok(outcome)
    }
}
