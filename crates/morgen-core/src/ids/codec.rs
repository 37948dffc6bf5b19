//! Codec for Morgen's composite identifier format
//!
//! Composite identifiers are base64-encoded JSON arrays with the trailing
//! `=` padding stripped:
//!
//! - Calendar ID: `[accountId, calendarEmail]`
//! - Event ID: `[calendarEmail, eventUid, accountId]`
//!
//! Because the lineage is packed into the identifier itself, the owning
//! account of a calendar and the owning account and calendar of an event
//! are recovered by decoding alone. No lookup table, no API call.
//!
//! Everything here is a structural transform: decoded field values are
//! not validated for plausibility (nothing checks that `calendarEmail`
//! looks like an email).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::Value as JsonValue;

use super::error::{IdError, IdResult};

/// Decode a composite identifier into its ordered tuple of fields
///
/// Restores the stripped base64 padding, decodes, and parses the JSON
/// array. Every stage failure maps to [`IdError::Malformed`].
pub fn decode_tuple(composite_id: &str) -> IdResult<Vec<String>> {
    let padded = add_base64_padding(composite_id);
    let bytes = BASE64
        .decode(padded.as_bytes())
        .map_err(|e| malformed(format!("invalid base64: {}", e)))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| malformed(format!("invalid UTF-8: {}", e)))?;
    let value: JsonValue = serde_json::from_str(&text)
        .map_err(|e| malformed(format!("invalid JSON: {}", e)))?;

    let JsonValue::Array(items) = value else {
        return Err(malformed("decoded payload is not a JSON array"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            JsonValue::String(s) => Ok(s),
            other => Err(malformed(format!(
                "tuple element {} is not a string: {}",
                i, other
            ))),
        })
        .collect()
}

/// Encode an ordered tuple of fields into a composite identifier
///
/// Compact JSON (no whitespace), base64, trailing `=` stripped. Exact
/// inverse of [`decode_tuple`] for any tuple of strings.
pub fn encode_tuple(values: &[&str]) -> String {
    let json = JsonValue::Array(
        values
            .iter()
            .map(|v| JsonValue::String((*v).to_string()))
            .collect(),
    )
    .to_string();
    let encoded = BASE64.encode(json.as_bytes());
    encoded.trim_end_matches('=').to_string()
}

/// Decoded fields of a calendar identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarIdParts {
    pub account_id: String,
    pub calendar_email: String,
}

impl CalendarIdParts {
    /// Decode a real calendar identifier
    ///
    /// # Errors
    /// [`IdError::Malformed`] if the identifier does not decode to a
    /// 2-element tuple.
    pub fn decode(calendar_id: &str) -> IdResult<Self> {
        let fields = decode_tuple(calendar_id)?;
        let [account_id, calendar_email] = expect_arity::<2>("calendar", fields)?;
        Ok(Self {
            account_id,
            calendar_email,
        })
    }

    /// Re-encode these fields into a real calendar identifier
    pub fn encode(&self) -> String {
        encode_tuple(&[&self.account_id, &self.calendar_email])
    }
}

/// Decoded fields of an event identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventIdParts {
    pub calendar_email: String,
    pub event_uid: String,
    pub account_id: String,
}

impl EventIdParts {
    /// Decode a real event identifier
    ///
    /// # Errors
    /// [`IdError::Malformed`] if the identifier does not decode to a
    /// 3-element tuple.
    pub fn decode(event_id: &str) -> IdResult<Self> {
        let fields = decode_tuple(event_id)?;
        let [calendar_email, event_uid, account_id] = expect_arity::<3>("event", fields)?;
        Ok(Self {
            calendar_email,
            event_uid,
            account_id,
        })
    }

    /// Reconstruct the real identifier of the calendar owning this event
    ///
    /// The event tuple carries no calendar identifier; it is rebuilt from
    /// the account and calendar email fields.
    pub fn calendar_id(&self) -> String {
        encode_tuple(&[&self.account_id, &self.calendar_email])
    }
}

/// Extract the owning account identifier from a real calendar identifier
pub fn account_from_calendar(calendar_id: &str) -> IdResult<String> {
    CalendarIdParts::decode(calendar_id).map(|parts| parts.account_id)
}

/// Extract the owning account and calendar identifiers from a real event
/// identifier, without any lookup
pub fn ids_from_event(event_id: &str) -> IdResult<(String, String)> {
    let parts = EventIdParts::decode(event_id)?;
    let calendar_id = parts.calendar_id();
    Ok((parts.account_id, calendar_id))
}

/// Restore the `=` padding Morgen strips from composite identifiers.
fn add_base64_padding(encoded: &str) -> String {
    let remainder = encoded.len() % 4;
    if remainder == 0 {
        encoded.to_string()
    } else {
        let mut padded = String::with_capacity(encoded.len() + (4 - remainder));
        padded.push_str(encoded);
        for _ in 0..(4 - remainder) {
            padded.push('=');
        }
        padded
    }
}

fn expect_arity<const N: usize>(kind: &str, fields: Vec<String>) -> IdResult<[String; N]> {
    let got = fields.len();
    <[String; N]>::try_from(fields).map_err(|_| {
        malformed(format!(
            "{} ID tuple has {} elements, expected {}",
            kind, got, N
        ))
    })
}

fn malformed(reason: impl Into<String>) -> IdError {
    IdError::Malformed {
        reason: reason.into(),
    }
}
