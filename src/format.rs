//! Date and text formatting shared by the view-models and form fields.
//!
//! The backend speaks ISO 8601; the UI shows Finnish-style dates
//! (`5.3.2024`, `5.3.2024. 14:05`).

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// UI date format, parse side (single digits accepted).
pub const UI_DATE_PARSE_FORMAT: &str = "%d.%m.%Y";

/// UI date format, display side.
pub const UI_DATE_FORMAT: &str = "%-d.%-m.%Y";

/// UI date-and-time format.
pub const UI_DATE_AND_TIME_FORMAT: &str = "%-d.%-m.%Y. %H:%M";

/// Backend date format.
pub const BACKEND_DATE_FORMAT: &str = "%Y-%m-%d";

/// Placeholder shown for missing values.
pub const EMPTY_PLACEHOLDER: &str = "-";

/// Parse a date or timestamp in any of the formats the portal handles.
///
/// RFC 3339 timestamps keep the wall-clock time of their own offset.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    [BACKEND_DATE_FORMAT, UI_DATE_PARSE_FORMAT]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Whether a raw string value is a date.
pub fn is_date(value: &str) -> bool {
    parse_date(value).is_some()
}

/// Format a backend date/timestamp as a UI date.
pub fn to_ui_date(value: &str) -> Option<String> {
    parse_date(value).map(|dt| dt.format(UI_DATE_FORMAT).to_string())
}

/// Format a backend timestamp as a UI date with time.
pub fn to_ui_date_and_time(value: &str) -> Option<String> {
    parse_date(value).map(|dt| dt.format(UI_DATE_AND_TIME_FORMAT).to_string())
}

/// Convert a UI date (`d.M.yyyy`) to the backend format (`yyyy-MM-dd`).
pub fn ui_date_to_backend(value: &str) -> Option<String> {
    NaiveDate::parse_from_str(value.trim(), UI_DATE_PARSE_FORMAT)
        .ok()
        .map(|d| d.format(BACKEND_DATE_FORMAT).to_string())
}

/// Initials of a display name: first letter or digit of every word, uppercased.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
        .flat_map(char::to_uppercase)
        .collect()
}
