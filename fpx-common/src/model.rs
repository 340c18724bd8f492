//! Dataset row model

use chrono::NaiveDate;
use serde::Serialize;

/// Date format used for charting and API output
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// One forum post with its decoded labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub comment: String,
    pub tags: Vec<String>,
    pub pseudo: String,
    pub day: NaiveDate,
}

impl Post {
    pub fn has_tag(&self, label: &str) -> bool {
        self.tags.iter().any(|t| t == label)
    }
}

/// Parse a `day` cell
///
/// Accepts a plain date or any date-time whose first ten characters are the
/// date (`2025-05-01 12:30:00`, `2025-05-01T12:30:00Z`).
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10)?;
    if raw.len() > 10 && !matches!(raw.as_bytes()[10], b' ' | b'T') {
        return None;
    }
    NaiveDate::parse_from_str(date_part, DAY_FORMAT).ok()
}

/// Format a day the way charts and tables display it
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}
