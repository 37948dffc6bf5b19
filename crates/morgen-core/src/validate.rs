//! Input validators for Morgen API parameters
//!
//! Strict rejection with actionable messages. Nothing here auto-fixes
//! input: silently stripping a `Z` suffix or a UTC offset could shift an
//! event by hours, so malformed values are always bounced back to the
//! caller.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use regex::Regex;

use crate::{Error, Result};

/// Maximum span accepted by [`date_range`], in days (~6 months).
pub const MAX_RANGE_DAYS: i64 = 180;

static LOCAL_DATETIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}$").unwrap());

static UTC_OFFSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+-]\d{2}:\d{2}$").unwrap());

static ISO_DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:\d+Y)?(?:\d+M)?(?:\d+W)?(?:\d+D)?(?:T(?:\d+H)?(?:\d+M)?(?:\d+(?:\.\d+)?S)?)?$")
        .unwrap()
});

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Validate LocalDateTime format (`YYYY-MM-DDTHH:mm:ss`, no suffix)
///
/// Morgen expects local wall-clock times; the timezone travels in a
/// separate `timeZone` field. `Z` suffixes and UTC offsets are rejected
/// with pointers at that convention.
pub fn local_datetime(value: &str, field_name: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Validation(format!("'{}' cannot be empty", field_name)));
    }

    if value.ends_with('Z') {
        return Err(Error::Validation(format!(
            "Invalid {} format: '{}'. Remove the 'Z' suffix - use LocalDateTime format \
             (e.g., '2023-03-01T10:00:00'). The timezone should be specified separately \
             in the time_zone parameter.",
            field_name, value
        )));
    }

    // A third '-' or any '+' suggests a trailing UTC offset.
    if (value.contains('+') || value.matches('-').count() > 2) && UTC_OFFSET_RE.is_match(value) {
        return Err(Error::Validation(format!(
            "Invalid {} format: '{}'. Remove the timezone offset - use LocalDateTime \
             format (e.g., '2023-03-01T10:00:00'). The timezone should be specified \
             separately in the time_zone parameter.",
            field_name, value
        )));
    }

    if !LOCAL_DATETIME_RE.is_match(value) {
        return Err(Error::Validation(format!(
            "Invalid {} format: '{}'. Expected LocalDateTime format: YYYY-MM-DDTHH:mm:ss \
             (e.g., '2023-03-01T10:00:00')",
            field_name, value
        )));
    }

    Ok(())
}

/// Validate ISO 8601 duration format
pub fn duration(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Validation("'duration' cannot be empty".to_string()));
    }

    if !ISO_DURATION_RE.is_match(value) {
        return Err(Error::Validation(format!(
            "Invalid duration format: '{}'. Use ISO 8601 duration format. Examples: \
             'PT1H' (1 hour), 'PT30M' (30 minutes), 'PT1H30M' (1.5 hours), 'P1D' (1 day)",
            value
        )));
    }

    // The pattern alone admits designators with no components.
    if value == "P" || value == "PT" {
        return Err(Error::Validation(format!(
            "Invalid duration: '{}'. Duration must specify a time value. Examples: \
             'PT1H' (1 hour), 'PT30M' (30 minutes)",
            value
        )));
    }

    Ok(())
}

/// Validate an IANA timezone identifier
///
/// Unknown names get suggestions for the common abbreviation mistakes
/// (PST, CEST, GMT+2 and friends).
pub fn timezone(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Validation(
            "'time_zone' cannot be an empty string (omit it for floating events)".to_string(),
        ));
    }

    if value.parse::<Tz>().is_ok() {
        return Ok(());
    }

    let upper = value.to_uppercase();
    let suggestions: &[&str] = if matches!(
        upper.as_str(),
        "EST" | "PST" | "CST" | "MST" | "EDT" | "PDT" | "CDT" | "MDT"
    ) {
        &[
            "America/New_York (Eastern)",
            "America/Chicago (Central)",
            "America/Denver (Mountain)",
            "America/Los_Angeles (Pacific)",
        ]
    } else if upper.starts_with("GMT") || upper.starts_with("UTC") {
        &["UTC", "Etc/GMT", "Europe/London"]
    } else if matches!(upper.as_str(), "CET" | "CEST") {
        &["Europe/Berlin", "Europe/Paris", "Europe/Rome"]
    } else {
        &[]
    };

    let mut msg = format!("Invalid timezone: '{}'. Use IANA timezone format.", value);
    if suggestions.is_empty() {
        msg.push_str(" Examples: 'Europe/Berlin', 'America/New_York', 'Asia/Tokyo', 'UTC'");
    } else {
        msg.push_str(&format!(" Did you mean: {}?", suggestions.join(", ")));
    }

    Err(Error::Validation(msg))
}

/// Validate email address format (structural check only)
pub fn email(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Validation("Email address cannot be empty".to_string()));
    }

    if !EMAIL_RE.is_match(value) {
        return Err(Error::Validation(format!(
            "Invalid email format: '{}'. Expected format: 'user@domain.com'",
            value
        )));
    }

    Ok(())
}

/// Validate hex color format (`#RRGGBB`)
pub fn hex_color(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Validation("Color cannot be empty".to_string()));
    }

    if !HEX_COLOR_RE.is_match(value) {
        return Err(Error::Validation(format!(
            "Invalid color format: '{}'. Use hex format: '#RRGGBB' (e.g., '#FF5733', '#7EF2FC')",
            value
        )));
    }

    Ok(())
}

/// Validate that a date range is ordered and within the query limit
///
/// Both endpoints must already be in LocalDateTime format.
pub fn date_range(start: &str, end: &str) -> Result<()> {
    let start_dt = parse_local(start)
        .map_err(|e| Error::Validation(format!("Cannot parse date range: {}", e)))?;
    let end_dt = parse_local(end)
        .map_err(|e| Error::Validation(format!("Cannot parse date range: {}", e)))?;

    if end_dt <= start_dt {
        return Err(Error::Validation(format!(
            "'end' ({}) must be after 'start' ({})",
            end, start
        )));
    }

    let days = (end_dt - start_dt).num_days();
    if days > MAX_RANGE_DAYS {
        return Err(Error::Validation(format!(
            "Date range too large: {} days. Maximum allowed is {} days (~6 months). \
             The Morgen API recommends retrieving no more than 2 months at a time.",
            days, MAX_RANGE_DAYS
        )));
    }

    Ok(())
}

fn parse_local(value: &str) -> std::result::Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
}
