//! Camera access and single-frame capture.
//!
//! A [`CameraDevice`] is the platform's video stream. [`PhotoCapturer`]
//! tracks whether the live preview is running and freezes one frame into
//! a [`Capture`] when asked. Capturing is always an explicit call.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use presensi_core::capture::{Capture, CaptureSettings};
use presensi_core::error::CoreError;
use presensi_core::messages::CAMERA_UNAVAILABLE;
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("{}", CAMERA_UNAVAILABLE)]
    Unavailable,

    /// No live preview to freeze a frame from.
    #[error("Preview kamera tidak aktif")]
    PreviewInactive,

    #[error("Gagal membaca frame kamera: {0}")]
    Frame(String),

    #[error(transparent)]
    Encode(#[from] CoreError),
}

/// Platform camera stream.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Start the stream with the preferred resolution and facing.
    async fn open(&self, settings: &CaptureSettings) -> Result<(), CameraError>;

    /// The current frame as an encoded image.
    async fn grab_frame(&self) -> Result<Vec<u8>, CameraError>;
}

/// Camera whose "stream" is an image file on disk.
pub struct FileCamera {
    path: PathBuf,
}

impl FileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CameraDevice for FileCamera {
    async fn open(&self, _settings: &CaptureSettings) -> Result<(), CameraError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) if meta.is_file() => Ok(()),
            Ok(_) => Err(CameraError::Unavailable),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Camera source missing");
                Err(CameraError::Unavailable)
            }
        }
    }

    async fn grab_frame(&self) -> Result<Vec<u8>, CameraError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| CameraError::Frame(e.to_string()))
    }
}

/// Camera for platforms without one, or where access was denied.
pub struct UnavailableCamera;

#[async_trait]
impl CameraDevice for UnavailableCamera {
    async fn open(&self, _settings: &CaptureSettings) -> Result<(), CameraError> {
        Err(CameraError::Unavailable)
    }

    async fn grab_frame(&self) -> Result<Vec<u8>, CameraError> {
        Err(CameraError::Unavailable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    /// Not started, or the camera could not be opened.
    Unavailable,
    /// Live preview running; a frame can be captured.
    Live,
    /// A frame has been frozen; retake to go back to `Live`.
    Frozen,
}

pub struct PhotoCapturer {
    device: Arc<dyn CameraDevice>,
    settings: CaptureSettings,
    preview: Mutex<PreviewState>,
}

impl PhotoCapturer {
    pub fn new(device: Arc<dyn CameraDevice>, settings: CaptureSettings) -> Self {
        Self {
            device,
            settings,
            preview: Mutex::new(PreviewState::Unavailable),
        }
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    pub async fn preview_state(&self) -> PreviewState {
        *self.preview.lock().await
    }

    /// Open the camera and start the live preview.
    pub async fn start(&self) -> Result<(), CameraError> {
        let mut preview = self.preview.lock().await;
        match self.device.open(&self.settings).await {
            Ok(()) => {
                *preview = PreviewState::Live;
                tracing::debug!(
                    width = self.settings.width,
                    height = self.settings.height,
                    "Camera preview started",
                );
                Ok(())
            }
            Err(e) => {
                *preview = PreviewState::Unavailable;
                tracing::warn!(error = %e, "Camera could not be opened");
                Err(e)
            }
        }
    }

    /// Freeze the current frame. Only valid while the preview is live.
    pub async fn capture(&self) -> Result<Capture, CameraError> {
        let mut preview = self.preview.lock().await;
        if *preview != PreviewState::Live {
            return Err(CameraError::PreviewInactive);
        }

        let frame = self.device.grab_frame().await?;
        let capture = Capture::from_frame(&frame, &self.settings)?;
        *preview = PreviewState::Frozen;

        tracing::debug!(bytes = capture.len(), "Frame captured");
        Ok(capture)
    }

    /// Go back to the live preview after a capture was discarded.
    pub async fn resume(&self) {
        let mut preview = self.preview.lock().await;
        if *preview == PreviewState::Frozen {
            *preview = PreviewState::Live;
        }
    }
}
