//! Formatting of report values for display, `id-ID` style.

use chrono::{Datelike, TimeZone};

use crate::attendance::CoordinateValue;
use crate::messages::NOT_AVAILABLE;
use crate::types::Timestamp;

const MONTHS_ID: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// `02 Jan 2024`, or `N/A` when the timestamp is missing.
pub fn format_date<Tz: TimeZone>(ts: Option<Timestamp>, tz: &Tz) -> String {
    match ts {
        Some(ts) => {
            let local = ts.with_timezone(tz);
            format!(
                "{:02} {} {}",
                local.day(),
                MONTHS_ID[local.month0() as usize],
                local.year()
            )
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// 24-hour `HH.MM`, or `N/A` when the timestamp is missing.
pub fn format_time<Tz: TimeZone>(ts: Option<Timestamp>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match ts {
        Some(ts) => ts.with_timezone(tz).format("%H.%M").to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Six decimal places when the column is set and numeric, else `N/A`.
pub fn format_coordinate(value: Option<&CoordinateValue>) -> String {
    match value.filter(|v| v.is_present()).and_then(CoordinateValue::value) {
        Some(v) => format!("{v:.6}"),
        None => NOT_AVAILABLE.to_string(),
    }
}
