//! Still-image captures used as proof of presence.
//!
//! A camera frame arrives as an encoded image of whatever size the
//! device produces. [`Capture::from_frame`] decodes it, scales it to the
//! configured target resolution and re-encodes it as JPEG so every
//! submitted photo has the same shape.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use crate::error::CoreError;

pub const DEFAULT_CAPTURE_WIDTH: u32 = 640;
pub const DEFAULT_CAPTURE_HEIGHT: u32 = 480;

/// MIME type of every encoded capture.
pub const CAPTURE_CONTENT_TYPE: &str = "image/jpeg";

/// Which camera to prefer when the device has more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// Front ("user") camera, the selfie default.
    #[default]
    Front,
    Back,
}

/// Target shape of captured frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSettings {
    pub width: u32,
    pub height: u32,
    pub facing: Facing,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_CAPTURE_WIDTH,
            height: DEFAULT_CAPTURE_HEIGHT,
            facing: Facing::Front,
        }
    }
}

/// A single frozen camera frame, JPEG encoded.
#[derive(Clone, PartialEq)]
pub struct Capture {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for Capture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capture")
            .field("len", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Capture {
    /// Decode an encoded frame (PNG, JPEG or WebP), scale it to the target
    /// resolution and re-encode it as JPEG.
    pub fn from_frame(frame: &[u8], settings: &CaptureSettings) -> Result<Self, CoreError> {
        if frame.is_empty() {
            return Err(CoreError::Validation("Camera frame is empty".to_string()));
        }
        if settings.width == 0 || settings.height == 0 {
            return Err(CoreError::Validation(format!(
                "Capture resolution must be non-zero, got {}x{}",
                settings.width, settings.height
            )));
        }

        let decoded = image::load_from_memory(frame)
            .map_err(|e| CoreError::Validation(format!("Unreadable camera frame: {e}")))?;

        let scaled = decoded.resize_exact(settings.width, settings.height, FilterType::Triangle);
        // JPEG has no alpha channel.
        let rgb = DynamicImage::ImageRgb8(scaled.to_rgb8());

        let mut bytes = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .map_err(|e| CoreError::Internal(format!("Failed to encode capture: {e}")))?;

        Ok(Self {
            bytes,
            width: settings.width,
            height: settings.height,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn content_type(&self) -> &'static str {
        CAPTURE_CONTENT_TYPE
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use image::{Rgba, RgbaImage};

    use super::*;

    fn png_frame(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([200, 120, 40, 255]));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn frame_is_scaled_to_target_and_encoded_as_jpeg() {
        let capture = Capture::from_frame(&png_frame(32, 24), &CaptureSettings::default()).unwrap();
        assert_eq!(capture.width(), 640);
        assert_eq!(capture.height(), 480);
        assert!(!capture.is_empty());
        // JPEG SOI marker.
        assert_eq!(&capture.bytes()[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(capture.bytes()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (640, 480));
    }

    #[test]
    fn custom_resolution() {
        let settings = CaptureSettings {
            width: 64,
            height: 48,
            ..Default::default()
        };
        let capture = Capture::from_frame(&png_frame(10, 10), &settings).unwrap();
        assert_eq!((capture.width(), capture.height()), (64, 48));
    }

    #[test]
    fn empty_frame_rejected() {
        assert_matches!(
            Capture::from_frame(&[], &CaptureSettings::default()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn garbage_frame_rejected() {
        assert_matches!(
            Capture::from_frame(b"not an image", &CaptureSettings::default()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn front_camera_is_default() {
        assert_eq!(CaptureSettings::default().facing, Facing::Front);
    }
}
