//! Wire models for the Morgen v3 API
//!
//! Based on the JSCalendar-inspired schema from the Morgen documentation.
//! Vendor extension fields keep their prefixed wire names
//! (`morgen.so:metadata`, `google.com:colorId`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Connected calendar account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub provider_id: Option<String>,
    pub integration_id: String,
    pub provider_user_id: String,
    pub provider_user_display_name: String,
}

/// Permissions for a calendar
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarRights {
    pub may_read_free_busy: bool,
    pub may_read_items: bool,
    pub may_write_all: bool,
    pub may_write_own: bool,
    pub may_update_private: bool,
    #[serde(rename = "mayRSVP")]
    pub may_rsvp: bool,
    pub may_admin: bool,
    pub may_delete: bool,
}

/// Morgen-specific calendar metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_name: Option<String>,
}

/// Morgen calendar
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    pub id: String,
    pub account_id: String,
    pub integration_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub my_rights: Option<CalendarRights>,
    #[serde(default, rename = "morgen.so:metadata")]
    pub metadata: Option<CalendarMetadata>,
}

/// Request to update calendar metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarUpdateRequest {
    pub id: String,
    pub account_id: String,
    #[serde(rename = "morgen.so:metadata")]
    pub metadata: CalendarMetadata,
}

/// Event location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "@type", default = "location_type")]
    pub at_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Location {
    /// Create a named location
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            at_type: location_type(),
            name: Some(name.into()),
        }
    }
}

/// Participant roles in an event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticipantRoles {
    pub attendee: bool,
    pub owner: bool,
}

/// Event participant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(rename = "@type", default = "participant_type")]
    pub at_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<ParticipantRoles>,
    #[serde(default)]
    pub account_owner: bool,
    #[serde(default = "needs_action")]
    pub participation_status: String,
}

impl Participant {
    /// Create an invited attendee from an email address
    ///
    /// The display name falls back to the local part of the address.
    pub fn attendee(email: impl Into<String>) -> Self {
        let email = email.into();
        let name = email.split('@').next().unwrap_or_default().to_string();
        Self {
            at_type: participant_type(),
            name: Some(name),
            email: Some(email),
            roles: Some(ParticipantRoles {
                attendee: true,
                owner: false,
            }),
            account_owner: false,
            participation_status: needs_action(),
        }
    }

    /// Whether this participant organizes the event
    pub fn is_organizer(&self) -> bool {
        self.roles.as_ref().is_some_and(|r| r.owner)
    }
}

/// Day component in a recurrence rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NDay {
    #[serde(rename = "@type", default = "nday_type")]
    pub at_type: String,
    /// "mo", "tu", "we", "th", "fr", "sa", "su"
    pub day: String,
}

/// Recurrence rule for repeating events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    #[serde(rename = "@type", default = "recurrence_rule_type")]
    pub at_type: String,
    /// "daily", "weekly", "monthly", "yearly"
    pub frequency: String,
    #[serde(default = "default_interval")]
    pub interval: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_day: Option<Vec<NDay>>,
}

/// Derived virtual room information (read-only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualRoom {
    pub url: Option<String>,
}

/// Morgen-derived event fields (read-only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDerived {
    pub virtual_room: Option<VirtualRoom>,
}

/// Morgen calendar event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    pub calendar_id: String,
    pub account_id: String,
    pub integration_id: String,
    #[serde(default)]
    pub base_event_id: Option<String>,
    #[serde(default)]
    pub master_event_id: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub recurrence_id: Option<String>,
    #[serde(default)]
    pub recurrence_id_time_zone: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// LocalDateTime format: "2023-03-01T10:15:00"
    pub start: String,
    #[serde(default)]
    pub time_zone: Option<String>,
    /// ISO 8601 duration: "PT1H", "PT30M"
    pub duration: String,
    #[serde(default)]
    pub show_without_time: bool,
    /// "public", "private", "secret"
    #[serde(default = "privacy_public")]
    pub privacy: String,
    /// "free", "busy"
    #[serde(default = "free_busy_busy")]
    pub free_busy_status: String,
    #[serde(default)]
    pub locations: Option<HashMap<String, Location>>,
    #[serde(default)]
    pub participants: Option<HashMap<String, Participant>>,
    #[serde(default)]
    pub recurrence_rules: Option<Vec<RecurrenceRule>>,
    #[serde(default, rename = "google.com:colorId")]
    pub google_color_id: Option<String>,
    #[serde(default, rename = "morgen.so:derived")]
    pub derived: Option<EventDerived>,
}

impl Event {
    /// URL of the derived virtual meeting room, when one exists
    pub fn virtual_room_url(&self) -> Option<&str> {
        self.derived
            .as_ref()
            .and_then(|d| d.virtual_room.as_ref())
            .and_then(|room| room.url.as_deref())
    }
}

/// Request to create a new event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCreateRequest {
    pub account_id: String,
    pub calendar_id: String,
    pub title: String,
    /// LocalDateTime format
    pub start: String,
    /// ISO 8601 duration
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub show_without_time: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<HashMap<String, Location>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<HashMap<String, Participant>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_busy_status: Option<String>,
    #[serde(
        default,
        rename = "morgen.so:requestVirtualRoom",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_virtual_room: Option<String>,
}

impl EventCreateRequest {
    pub fn new(
        account_id: impl Into<String>,
        calendar_id: impl Into<String>,
        title: impl Into<String>,
        start: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            calendar_id: calendar_id.into(),
            title: title.into(),
            start: start.into(),
            duration: duration.into(),
            time_zone: None,
            show_without_time: false,
            description: None,
            locations: None,
            participants: None,
            privacy: None,
            free_busy_status: None,
            request_virtual_room: None,
        }
    }

    pub fn with_time_zone(mut self, time_zone: Option<String>) -> Self {
        self.time_zone = time_zone;
        self
    }

    pub fn all_day(mut self, value: bool) -> Self {
        self.show_without_time = value;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_locations(mut self, locations: Option<HashMap<String, Location>>) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_participants(
        mut self,
        participants: Option<HashMap<String, Participant>>,
    ) -> Self {
        self.participants = participants;
        self
    }

    pub fn with_privacy(mut self, privacy: impl Into<String>) -> Self {
        self.privacy = Some(privacy.into());
        self
    }

    pub fn with_free_busy_status(mut self, status: impl Into<String>) -> Self {
        self.free_busy_status = Some(status.into());
        self
    }

    pub fn with_virtual_room(mut self, service: Option<String>) -> Self {
        self.request_virtual_room = service;
        self
    }
}

/// Request to update an existing event
///
/// Only the populated optional fields are sent; the Morgen API leaves
/// the rest of the event untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdateRequest {
    pub id: String,
    pub account_id: String,
    pub calendar_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_without_time: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// An empty map removes every location from the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<HashMap<String, Location>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_busy_status: Option<String>,
}

impl EventUpdateRequest {
    pub fn new(
        id: impl Into<String>,
        account_id: impl Into<String>,
        calendar_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            account_id: account_id.into(),
            calendar_id: calendar_id.into(),
            title: None,
            start: None,
            duration: None,
            time_zone: None,
            show_without_time: None,
            description: None,
            locations: None,
            privacy: None,
            free_busy_status: None,
        }
    }
}

/// Request to delete an event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDeleteRequest {
    pub id: String,
    pub account_id: String,
    pub calendar_id: String,
}

/// How an update or delete applies to a recurring event series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesUpdateMode {
    /// Affect this occurrence only
    #[default]
    Single,
    /// Affect this and future occurrences
    Future,
    /// Affect every event in the series
    All,
}

impl SeriesUpdateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Future => "future",
            Self::All => "all",
        }
    }
}

/// Identifiers of a newly created event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEventInfo {
    pub id: String,
    pub calendar_id: String,
    pub account_id: String,
}

/// Rate limit information from response headers
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateLimitInfo {
    pub limit: u64,
    pub remaining: u64,
    pub reset_seconds: u64,
}

/// Generic `{"data": ...}` response wrapper
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AccountsPayload {
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CalendarsPayload {
    pub calendars: Vec<Calendar>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EventsPayload {
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EventCreatePayload {
    pub event: CreatedEventInfo,
}

fn location_type() -> String {
    "Location".to_string()
}

fn participant_type() -> String {
    "Participant".to_string()
}

fn nday_type() -> String {
    "NDay".to_string()
}

fn recurrence_rule_type() -> String {
    "RecurrenceRule".to_string()
}

fn needs_action() -> String {
    "needs-action".to_string()
}

fn privacy_public() -> String {
    "public".to_string()
}

fn free_busy_busy() -> String {
    "busy".to_string()
}

fn default_interval() -> i64 {
    1
}
