//! Attendance records as the reporting API returns them.
//!
//! Records are read-only from the client's side. Ids and coordinates may
//! arrive as JSON numbers or as numeric strings, and timestamps are kept as
//! sent so one malformed row never fails a whole listing.

use chrono::DateTime;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::types::{DbId, Timestamp};

/// Owner of a record, when the server embeds it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordOwner {
    #[serde(default)]
    pub nama: String,
    #[serde(default)]
    pub email: String,
}

/// One check-in/check-out event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<DbId>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub user_id: Option<DbId>,
    #[serde(default)]
    pub nama: Option<String>,
    #[serde(default)]
    pub user: Option<RecordOwner>,
    #[serde(default)]
    pub check_in: Option<String>,
    #[serde(default)]
    pub check_out: Option<String>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub latitude: Option<CoordinateValue>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub longitude: Option<CoordinateValue>,
    #[serde(default)]
    pub bukti_foto: Option<String>,
}

/// A coordinate column as the server sent it. Decimal columns often come
/// through as strings such as `"0.00000000"`, so whether the column is set
/// and what number it holds are answered separately.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateValue {
    Number(f64),
    Text(String),
}

impl CoordinateValue {
    /// Set at all: any non-empty text, or a non-zero number.
    pub fn is_present(&self) -> bool {
        match self {
            CoordinateValue::Number(n) => *n != 0.0 && !n.is_nan(),
            CoordinateValue::Text(s) => !s.is_empty(),
        }
    }

    /// Numeric value, when the column parses as a finite number.
    pub fn value(&self) -> Option<f64> {
        let n = match self {
            CoordinateValue::Number(n) => *n,
            CoordinateValue::Text(s) => s.trim().parse().ok()?,
        };
        n.is_finite().then_some(n)
    }
}

impl AttendanceRecord {
    /// Display name: embedded owner first, then the flat `nama` column.
    pub fn display_name(&self) -> Option<&str> {
        match &self.user {
            Some(owner) => Some(owner.nama.as_str()),
            None => self.nama.as_deref().filter(|n| !n.is_empty()),
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().map(|owner| owner.email.as_str())
    }

    /// First letter of the display name, upper-cased, or `U` when unknown.
    pub fn initial(&self) -> char {
        self.display_name()
            .and_then(|n| n.chars().next())
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('U')
    }

    pub fn check_in_at(&self) -> Option<Timestamp> {
        self.check_in.as_deref().and_then(parse_timestamp)
    }

    pub fn check_out_at(&self) -> Option<Timestamp> {
        self.check_out.as_deref().and_then(parse_timestamp)
    }

    pub fn latitude_value(&self) -> Option<f64> {
        self.latitude.as_ref().and_then(CoordinateValue::value)
    }

    pub fn longitude_value(&self) -> Option<f64> {
        self.longitude.as_ref().and_then(CoordinateValue::value)
    }

    /// A record counts as located when its latitude column is set.
    pub fn has_location(&self) -> bool {
        self.latitude.as_ref().is_some_and(CoordinateValue::is_present)
    }

    pub fn has_photo(&self) -> bool {
        self.bukti_foto.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn is_checked_out(&self) -> bool {
        self.check_out.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// Envelope of `GET /api/reports/daily`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportResponse {
    #[serde(default)]
    pub data: Option<Vec<AttendanceRecord>>,
}

impl ReportResponse {
    pub fn into_records(self) -> Vec<AttendanceRecord> {
        self.data.unwrap_or_default()
    }
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.to_utc())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<CoordinateValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawCoordinate>::deserialize(deserializer)? {
        Some(RawCoordinate::Number(n)) => Some(CoordinateValue::Number(n)),
        Some(RawCoordinate::Text(s)) => Some(CoordinateValue::Text(s)),
        Some(RawCoordinate::Other(_)) | None => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(DbId),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<DbId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Number(id)) => Some(id),
        Some(RawId::Text(s)) => s.trim().parse().ok(),
        Some(RawId::Other(_)) | None => None,
    })
}
