use std::path::PathBuf;
use std::time::Duration;

use presensi_core::capture::{CaptureSettings, DEFAULT_CAPTURE_HEIGHT, DEFAULT_CAPTURE_WIDTH};
use presensi_core::error::CoreError;
use presensi_core::geo::{Coordinate, LocationOptions, DEFAULT_LOCATION_TIMEOUT};

const DEFAULT_API_URL: &str = "http://localhost:3001";
const DEFAULT_SESSION_FILE: &str = ".presensi-session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("PRESENSI_LATITUDE and PRESENSI_LONGITUDE must be set together")]
    PartialLocation,

    #[error(transparent)]
    Location(#[from] CoreError),
}

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the presensi API (default: `http://localhost:3001`).
    pub api_url: String,
    /// File holding the persisted session (default: `.presensi-session.json`).
    pub session_file: PathBuf,
    /// Options for every position request.
    pub location: LocationOptions,
    /// Target shape of captured photos.
    pub capture: CaptureSettings,
    /// Position reported by the fixed location provider, if configured.
    pub fixed_location: Option<Coordinate>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            location: LocationOptions::default(),
            capture: CaptureSettings::default(),
            fixed_location: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                   |
    /// |---------------------------|---------------------------|
    /// | `PRESENSI_API_URL`        | `http://localhost:3001`   |
    /// | `PRESENSI_SESSION_FILE`   | `.presensi-session.json`  |
    /// | `PRESENSI_GEO_TIMEOUT_MS` | `5000`                    |
    /// | `PRESENSI_CAPTURE_WIDTH`  | `640`                     |
    /// | `PRESENSI_CAPTURE_HEIGHT` | `480`                     |
    /// | `PRESENSI_LATITUDE`       | unset                     |
    /// | `PRESENSI_LONGITUDE`      | unset                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable
    /// source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = var("PRESENSI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());

        let session_file = var("PRESENSI_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));

        let timeout_ms: u64 = parse_or(
            "PRESENSI_GEO_TIMEOUT_MS",
            var("PRESENSI_GEO_TIMEOUT_MS"),
            DEFAULT_LOCATION_TIMEOUT.as_millis() as u64,
            "a number of milliseconds",
        )?;

        let width: u32 = parse_or(
            "PRESENSI_CAPTURE_WIDTH",
            var("PRESENSI_CAPTURE_WIDTH"),
            DEFAULT_CAPTURE_WIDTH,
            "a positive integer",
        )?;
        let height: u32 = parse_or(
            "PRESENSI_CAPTURE_HEIGHT",
            var("PRESENSI_CAPTURE_HEIGHT"),
            DEFAULT_CAPTURE_HEIGHT,
            "a positive integer",
        )?;
        if width == 0 {
            return Err(ConfigError::Invalid {
                var: "PRESENSI_CAPTURE_WIDTH",
                expected: "a positive integer",
                value: "0".into(),
            });
        }
        if height == 0 {
            return Err(ConfigError::Invalid {
                var: "PRESENSI_CAPTURE_HEIGHT",
                expected: "a positive integer",
                value: "0".into(),
            });
        }

        let fixed_location = match (var("PRESENSI_LATITUDE"), var("PRESENSI_LONGITUDE")) {
            (Some(lat), Some(lon)) => {
                let lat = parse_f64("PRESENSI_LATITUDE", &lat)?;
                let lon = parse_f64("PRESENSI_LONGITUDE", &lon)?;
                Some(Coordinate::new(lat, lon)?)
            }
            (None, None) => None,
            _ => return Err(ConfigError::PartialLocation),
        };

        Ok(Self {
            api_url,
            session_file,
            location: LocationOptions {
                timeout: Duration::from_millis(timeout_ms),
                ..LocationOptions::default()
            },
            capture: CaptureSettings {
                width,
                height,
                ..CaptureSettings::default()
            },
            fixed_location,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &'static str,
    value: Option<String>,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var,
            expected,
            value: raw,
        }),
    }
}

fn parse_f64(var: &'static str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        expected: "a decimal number",
        value: raw.to_string(),
    })
}
