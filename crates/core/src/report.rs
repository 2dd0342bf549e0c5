//! Report filtering and the statistics derived from a result set.

use serde::Serialize;

use crate::attendance::AttendanceRecord;
use crate::error::CoreError;

/// Criteria narrowing a `GET /api/reports/daily` listing.
///
/// Serializes to query parameters in the order `nama`, `startDate`,
/// `endDate`. Absent fields are omitted entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportFilter {
    #[serde(rename = "nama", skip_serializing_if = "Option::is_none")]
    nama: Option<String>,
    #[serde(rename = "startDate", skip_serializing_if = "Option::is_none")]
    start_date: Option<String>,
    #[serde(rename = "endDate", skip_serializing_if = "Option::is_none")]
    end_date: Option<String>,
}

/// Blank input counts as "not set".
fn present(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl ReportFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nama(mut self, nama: impl Into<String>) -> Self {
        self.nama = present(nama);
        self
    }

    pub fn with_start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = present(date);
        self
    }

    pub fn with_end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = present(date);
        self
    }

    pub fn nama(&self) -> Option<&str> {
        self.nama.as_deref()
    }

    pub fn start_date(&self) -> Option<&str> {
        self.start_date.as_deref()
    }

    pub fn end_date(&self) -> Option<&str> {
        self.end_date.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.nama.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }

    /// Drop every criterion.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Encoded query string including the leading `?`, or an empty string
    /// when no criterion is set.
    pub fn to_query_string(&self) -> Result<String, CoreError> {
        let encoded = serde_urlencoded::to_string(self)
            .map_err(|e| CoreError::Internal(format!("Failed to encode report filter: {e}")))?;
        if encoded.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!("?{encoded}"))
        }
    }
}

/// Counts shown above the report table. Always derived from the current
/// result set, never fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub with_location: usize,
    pub with_photo: usize,
    pub completed_checkout: usize,
}

impl ReportSummary {
    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            acc.total += 1;
            acc.with_location += usize::from(r.has_location());
            acc.with_photo += usize::from(r.has_photo());
            acc.completed_checkout += usize::from(r.is_checked_out());
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_start_date_in_fixed_order() {
        let filter = ReportFilter::new()
            .with_start_date("2024-01-01")
            .with_nama("budi");
        assert_eq!(
            filter.to_query_string().unwrap(),
            "?nama=budi&startDate=2024-01-01"
        );
    }

    #[test]
    fn start_date_only_emits_one_parameter() {
        let query = ReportFilter::new()
            .with_start_date("2024-01-01")
            .to_query_string()
            .unwrap();
        assert_eq!(query, "?startDate=2024-01-01");
        assert!(!query.contains("nama"));
        assert!(!query.contains("endDate"));
    }

    #[test]
    fn empty_filter_has_no_query() {
        assert_eq!(ReportFilter::new().to_query_string().unwrap(), "");
        assert!(ReportFilter::new().is_empty());
    }

    #[test]
    fn blank_fields_are_absent() {
        let filter = ReportFilter::new().with_nama("   ").with_end_date("");
        assert!(filter.is_empty());
        assert_eq!(filter.to_query_string().unwrap(), "");
    }

    #[test]
    fn values_are_url_encoded() {
        let filter = ReportFilter::new().with_nama("budi santoso&co");
        assert_eq!(
            filter.to_query_string().unwrap(),
            "?nama=budi+santoso%26co"
        );
    }

    #[test]
    fn full_range() {
        let filter = ReportFilter::new()
            .with_nama("ani")
            .with_start_date("2024-01-01")
            .with_end_date("2024-01-31");
        assert_eq!(
            filter.to_query_string().unwrap(),
            "?nama=ani&startDate=2024-01-01&endDate=2024-01-31"
        );
    }

    #[test]
    fn clear_resets_everything() {
        let mut filter = ReportFilter::new().with_nama("ani").with_end_date("2024-02-01");
        filter.clear();
        assert_eq!(filter, ReportFilter::default());
    }

    #[test]
    fn summary_counts() {
        let records: Vec<AttendanceRecord> = serde_json::from_str(
            r#"[
                {"id": 1, "latitude": -6.2, "buktiFoto": "a.jpg", "checkOut": "2024-01-01T09:00:00Z"},
                {"id": 2, "latitude": "-6.3"},
                {"id": 3, "buktiFoto": "c.jpg"},
                {"id": 4}
            ]"#,
        )
        .unwrap();
        let summary = ReportSummary::from_records(&records);
        assert_eq!(
            summary,
            ReportSummary {
                total: 4,
                with_location: 2,
                with_photo: 2,
                completed_checkout: 1,
            }
        );
    }

    #[test]
    fn summary_of_nothing() {
        assert_eq!(ReportSummary::from_records(&[]), ReportSummary::default());
    }
}
