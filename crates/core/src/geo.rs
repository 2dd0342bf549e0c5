//! Geolocation fixes and the ways acquiring one can fail.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::error::CoreError;
use crate::messages;
use crate::types::Timestamp;

/// Default upper bound on how long a single fix may take.
pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(5);

/// A single latitude/longitude fix. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
    #[serde(skip)]
    acquired_at: Timestamp,
}

impl Coordinate {
    /// Build a coordinate stamped with the current time.
    ///
    /// Rejects non-finite values and values outside the WGS84 ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        Self::at(latitude, longitude, Utc::now())
    }

    pub fn at(latitude: f64, longitude: f64, acquired_at: Timestamp) -> Result<Self, CoreError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::Validation(format!(
                "Latitude must be within -90..90, got {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::Validation(format!(
                "Longitude must be within -180..180, got {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
            acquired_at,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn acquired_at(&self) -> Timestamp {
        self.acquired_at
    }
}

/// Options for a one-shot position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Maximum age of a cached fix. Zero means always take a fresh one.
    pub maximum_age: Duration,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: DEFAULT_LOCATION_TIMEOUT,
            maximum_age: Duration::ZERO,
        }
    }
}

/// Reasons a position request can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationFailure {
    #[error("{}", messages::LOCATION_PERMISSION_DENIED)]
    PermissionDenied,

    #[error("{}", messages::LOCATION_TIMEOUT)]
    Timeout,

    #[error("{}", messages::LOCATION_UNAVAILABLE)]
    PositionUnavailable,

    #[error("{}", messages::LOCATION_UNSUPPORTED)]
    Unsupported,
}
