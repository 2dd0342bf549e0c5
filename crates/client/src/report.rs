//! Report listing with search and date-range filtering.

use std::sync::Arc;

use presensi_core::attendance::AttendanceRecord;
use presensi_core::messages::REPORT_FAILED;
use presensi_core::report::{ReportFilter, ReportSummary};

use crate::api::PresensiApi;
use crate::session::SessionStore;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// No bearer token; nothing was sent. Redirect to login.
    #[error("Not logged in")]
    Unauthenticated,

    /// The query failed; the result set was cleared.
    #[error("{0}")]
    Query(String),
}

/// State of the report page: the active filter and the last result set.
pub struct ReportView {
    api: Arc<PresensiApi>,
    sessions: Arc<SessionStore>,
    filter: ReportFilter,
    records: Vec<AttendanceRecord>,
    error: Option<String>,
    loading: bool,
}

impl ReportView {
    pub fn new(api: Arc<PresensiApi>, sessions: Arc<SessionStore>) -> Self {
        Self {
            api,
            sessions,
            filter: ReportFilter::default(),
            records: Vec::new(),
            error: None,
            loading: false,
        }
    }

    pub fn filter(&self) -> &ReportFilter {
        &self.filter
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary::from_records(&self.records)
    }

    /// Query with the current filter, replacing the result set.
    pub async fn fetch(&mut self) -> Result<&[AttendanceRecord], ReportError> {
        let Some(token) = self.sessions.token().await else {
            tracing::warn!("No session token, report query not sent");
            return Err(ReportError::Unauthenticated);
        };

        self.loading = true;
        let result = self.api.daily_report(&token, &self.filter).await;
        self.loading = false;

        match result {
            Ok(records) => {
                tracing::debug!(count = records.len(), "Report loaded");
                self.records = records;
                self.error = None;
                Ok(&self.records)
            }
            Err(e) => {
                tracing::error!(error = %e, "Report query failed");
                let message = e.user_message(REPORT_FAILED);
                self.records.clear();
                self.error = Some(message.clone());
                Err(ReportError::Query(message))
            }
        }
    }

    /// Replace the filter and query with it.
    pub async fn apply_filter(
        &mut self,
        filter: ReportFilter,
    ) -> Result<&[AttendanceRecord], ReportError> {
        self.filter = filter;
        self.fetch().await
    }

    /// Clear every criterion and re-run the unfiltered query.
    pub async fn reset(&mut self) -> Result<&[AttendanceRecord], ReportError> {
        self.filter.clear();
        self.fetch().await
    }
}
