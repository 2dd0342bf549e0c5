//! One-shot geolocation.
//!
//! A [`LocationProvider`] is the platform's position API. The
//! [`GeolocationAcquirer`] puts a hard time budget on it and tags each
//! request with a generation number so a newer request supersedes any
//! older one still in flight.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use presensi_core::geo::{Coordinate, LocationFailure, LocationOptions};

/// Platform position API.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self, options: &LocationOptions)
        -> Result<Coordinate, LocationFailure>;
}

/// Provider that always reports the same position, freshly stamped.
pub struct FixedLocationProvider {
    latitude: f64,
    longitude: f64,
}

impl FixedLocationProvider {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
        }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_position(
        &self,
        _options: &LocationOptions,
    ) -> Result<Coordinate, LocationFailure> {
        Coordinate::new(self.latitude, self.longitude)
            .map_err(|_| LocationFailure::PositionUnavailable)
    }
}

/// Provider for platforms without a position API.
pub struct UnavailableLocationProvider;

#[async_trait]
impl LocationProvider for UnavailableLocationProvider {
    async fn current_position(
        &self,
        _options: &LocationOptions,
    ) -> Result<Coordinate, LocationFailure> {
        Err(LocationFailure::Unsupported)
    }
}

/// Result of one [`GeolocationAcquirer::acquire`] call.
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub generation: u64,
    pub result: Result<Coordinate, LocationFailure>,
}

pub struct GeolocationAcquirer {
    provider: Arc<dyn LocationProvider>,
    options: LocationOptions,
    locating: AtomicBool,
    generation: AtomicU64,
}

impl GeolocationAcquirer {
    pub fn new(provider: Arc<dyn LocationProvider>, options: LocationOptions) -> Self {
        Self {
            provider,
            options,
            locating: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    pub fn options(&self) -> &LocationOptions {
        &self.options
    }

    /// True while the newest request is still waiting on the provider.
    pub fn is_locating(&self) -> bool {
        self.locating.load(Ordering::SeqCst)
    }

    /// Whether `generation` belongs to the newest request.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Request a fresh fix, bounded by the configured timeout.
    pub async fn acquire(&self) -> Acquisition {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.locating.store(true, Ordering::SeqCst);

        let result = match tokio::time::timeout(
            self.options.timeout,
            self.provider.current_position(&self.options),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(LocationFailure::Timeout),
        };

        match &result {
            Ok(c) => tracing::debug!(
                generation,
                latitude = c.latitude(),
                longitude = c.longitude(),
                "Location acquired",
            ),
            Err(e) => tracing::warn!(generation, error = %e, "Location unavailable"),
        }

        if self.is_current(generation) {
            self.locating.store(false, Ordering::SeqCst);
        }

        Acquisition { generation, result }
    }
}
