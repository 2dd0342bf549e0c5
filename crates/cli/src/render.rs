//! Plain-text rendering of the report and the dashboard.

use chrono::TimeZone;
use presensi_core::attendance::AttendanceRecord;
use presensi_core::display::{format_coordinate, format_date, format_time};
use presensi_core::messages::{
    CHECK_OUT_PENDING, NOT_AVAILABLE, PHOTO_UNAVAILABLE, REPORT_EMPTY, REPORT_EMPTY_HINT,
};
use presensi_core::report::ReportSummary;

const HEADERS: [&str; 6] = ["Nama", "Email", "Check-In", "Check-Out", "Lokasi", "Foto"];

fn timestamp_cell<Tz>(ts: Option<presensi_core::types::Timestamp>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{} {}", format_date(ts, tz), format_time(ts, tz))
}

fn row<Tz>(record: &AttendanceRecord, tz: &Tz) -> [String; 6]
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let check_out = if record.is_checked_out() {
        timestamp_cell(record.check_out_at(), tz)
    } else {
        CHECK_OUT_PENDING.to_string()
    };

    let location = format!(
        "{}, {}",
        format_coordinate(record.latitude.as_ref()),
        format_coordinate(record.longitude.as_ref())
    );

    [
        record.display_name().unwrap_or(NOT_AVAILABLE).to_string(),
        record.email().unwrap_or("-").to_string(),
        timestamp_cell(record.check_in_at(), tz),
        check_out,
        location,
        record
            .bukti_foto
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| PHOTO_UNAVAILABLE.to_string()),
    ]
}

/// Render records as an aligned table, one line per record. An empty
/// listing prints the no-data notice instead.
pub fn report_table<Tz>(records: &[AttendanceRecord], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if records.is_empty() {
        return format!("{REPORT_EMPTY}\n{REPORT_EMPTY_HINT}\n");
    }

    let rows: Vec<[String; 6]> = records.iter().map(|r| row(r, tz)).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, HEADERS.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &rows {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

pub fn summary_lines(summary: &ReportSummary) -> String {
    format!(
        "Total presensi     : {}\nDengan lokasi      : {}\nDengan foto        : {}\nSudah check-out    : {}\n",
        summary.total, summary.with_location, summary.with_photo, summary.completed_checkout
    )
}
