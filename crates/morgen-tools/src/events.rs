//! Event listing and mutation tools
//!
//! Virtual identifiers are resolved here and only real identifiers are
//! sent upstream. Account and calendar ownership is derived from the
//! composite event identifier without extra API calls.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future;
use morgen_api::{
    EventCreateRequest, EventDeleteRequest, EventUpdateRequest, Location, MorgenClient,
    Participant, SeriesUpdateMode,
};
use morgen_core::ids::{account_from_calendar, ids_from_event};
use morgen_core::{validate, Tool, ToolAnnotations, ToolResult, VirtualIdRegistry};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ToolError, ToolOutcome};
use crate::format::event_json;

/// Build the wire `locations` map from a location name
///
/// With `allow_empty`, an empty string turns into an empty map, which the
/// Morgen API interprets as "remove every location".
fn build_locations(location: Option<&str>, allow_empty: bool) -> Option<HashMap<String, Location>> {
    match location {
        None => None,
        Some("") => allow_empty.then(HashMap::new),
        Some(name) => Some(HashMap::from([("1".to_string(), Location::named(name))])),
    }
}

fn build_participants(emails: Option<&[String]>) -> Option<HashMap<String, Participant>> {
    let emails = emails.unwrap_or_default();
    if emails.is_empty() {
        return None;
    }
    Some(
        emails
            .iter()
            .map(|email| (email.clone(), Participant::attendee(email.as_str())))
            .collect(),
    )
}

/// The changeable fields of an event, shared by the single and batch
/// update tools
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct EventChanges {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) start: Option<String>,
    #[serde(default)]
    pub(crate) duration: Option<String>,
    #[serde(default)]
    pub(crate) time_zone: Option<String>,
    #[serde(default)]
    pub(crate) is_all_day: Option<bool>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) location: Option<String>,
    #[serde(default)]
    pub(crate) free_busy_status: Option<String>,
    #[serde(default)]
    pub(crate) privacy: Option<String>,
}

/// Validate a set of changes and turn them into an upstream update request
///
/// Resolves the virtual event identifier and derives the real account and
/// calendar identifiers from the composite event identifier, so no lookup
/// beyond the registry is needed.
pub(crate) fn build_update_request(
    registry: &VirtualIdRegistry,
    event_id: &str,
    changes: &EventChanges,
) -> Result<EventUpdateRequest, ToolError> {
    let timing_provided = [
        changes.start.is_some(),
        changes.duration.is_some(),
        changes.time_zone.is_some(),
        changes.is_all_day.is_some(),
    ]
    .iter()
    .filter(|&&provided| provided)
    .count();
    if timing_provided != 0 && timing_provided != 4 {
        return Err(ToolError::invalid_input(
            "When updating timing fields (start, duration, time_zone, is_all_day), all four \
             must be provided together.",
        ));
    }

    if let Some(start) = &changes.start {
        validate::local_datetime(start, "start")?;
    }
    if let Some(duration) = &changes.duration {
        validate::duration(duration)?;
    }
    if let Some(time_zone) = &changes.time_zone {
        validate::timezone(time_zone)?;
    }

    let real_event_id = registry.resolve(event_id)?;
    let (account_id, calendar_id) = ids_from_event(&real_event_id)?;

    let mut request = EventUpdateRequest::new(real_event_id, account_id, calendar_id);
    request.title = changes.title.clone();
    request.start = changes.start.clone();
    request.duration = changes.duration.clone();
    request.time_zone = changes.time_zone.clone();
    request.show_without_time = changes.is_all_day;
    request.description = changes.description.clone();
    request.locations = build_locations(changes.location.as_deref(), true);
    request.free_busy_status = changes.free_busy_status.clone();
    request.privacy = changes.privacy.clone();
    Ok(request)
}

#[derive(Debug, Deserialize)]
struct ListEventsInput {
    #[serde(default)]
    calendar_ids: Option<Vec<String>>,
    start: String,
    end: String,
}

/// List events from calendars within a time window
pub struct ListEventsTool {
    client: Arc<MorgenClient>,
    registry: Arc<VirtualIdRegistry>,
}

impl ListEventsTool {
    pub fn new(client: Arc<MorgenClient>, registry: Arc<VirtualIdRegistry>) -> Self {
        Self { client, registry }
    }

    async fn run(&self, input: ListEventsInput) -> ToolOutcome {
        tracing::debug!(start = %input.start, end = %input.end, "Listing events");

        validate::local_datetime(&input.start, "start")?;
        validate::local_datetime(&input.end, "end")?;
        validate::date_range(&input.start, &input.end)?;

        let real_calendar_ids = match &input.calendar_ids {
            Some(ids) if ids.is_empty() => {
                return Err(ToolError::invalid_input("calendar_ids cannot be empty"));
            }
            Some(ids) => self.registry.resolve_many(ids)?,
            None => {
                let calendars = self.client.list_calendars().await?;
                calendars.into_iter().map(|calendar| calendar.id).collect()
            }
        };

        // The upstream endpoint takes one account per request, so group
        // the calendars by the account packed into their composite id.
        let mut by_account: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for calendar_id in real_calendar_ids {
            let account_id = account_from_calendar(&calendar_id)?;
            by_account.entry(account_id).or_default().push(calendar_id);
        }

        let fetches = by_account.iter().map(|(account_id, calendar_ids)| {
            self.client
                .list_events(account_id, calendar_ids, &input.start, &input.end)
        });
        let batches = future::try_join_all(fetches).await?;

        let events: Vec<Value> = batches
            .iter()
            .flatten()
            .map(|event| event_json(&self.registry, event))
            .collect();

        Ok(json!({
            "events": events,
            "count": events.len(),
        }))
    }
}

#[async_trait]
impl Tool for ListEventsTool {
    fn name(&self) -> &str {
        "morgen_list_events"
    }

    fn description(&self) -> &str {
        "List events from calendars within a time window. Recurring events are \
         automatically expanded to individual occurrences; deleted or cancelled events \
         are not included. Omit calendar_ids to query every calendar."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "calendar_ids": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Virtual calendar IDs to query (from morgen_list_calendars). Omit to query all calendars."
                },
                "start": {
                    "type": "string",
                    "description": "Start of time window in LocalDateTime format (e.g. \"2023-03-01T00:00:00\")"
                },
                "end": {
                    "type": "string",
                    "description": "End of time window in LocalDateTime format. Max 6 months from start."
                }
            },
            "required": ["start", "end"]
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::new("List Events")
            .read_only(true)
            .open_world(true)
    }

    async fn execute(&self, input: Value) -> morgen_core::Result<ToolResult> {
        let input: ListEventsInput = serde_json::from_value(input)
            .map_err(|e| morgen_core::Error::ToolExecution(format!("Invalid input: {e}")))?;
        match self.run(input).await {
            Ok(output) => Ok(ToolResult::success(output.to_string())),
            Err(e) => Ok(ToolResult::error(e.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateEventInput {
    calendar_id: String,
    title: String,
    start: String,
    duration: String,
    #[serde(default)]
    time_zone: Option<String>,
    #[serde(default)]
    is_all_day: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    participants: Option<Vec<String>>,
    #[serde(default = "default_free_busy")]
    free_busy_status: String,
    #[serde(default = "default_privacy")]
    privacy: String,
    #[serde(default)]
    request_virtual_room: Option<String>,
}

fn default_free_busy() -> String {
    "busy".to_string()
}

fn default_privacy() -> String {
    "public".to_string()
}

/// Create a new calendar event
pub struct CreateEventTool {
    client: Arc<MorgenClient>,
    registry: Arc<VirtualIdRegistry>,
}

impl CreateEventTool {
    pub fn new(client: Arc<MorgenClient>, registry: Arc<VirtualIdRegistry>) -> Self {
        Self { client, registry }
    }

    async fn run(&self, input: CreateEventInput) -> ToolOutcome {
        tracing::debug!(calendar_id = %input.calendar_id, title = %input.title, "Creating event");

        validate::local_datetime(&input.start, "start")?;
        validate::duration(&input.duration)?;
        if let Some(time_zone) = &input.time_zone {
            validate::timezone(time_zone)?;
        }
        if let Some(participants) = &input.participants {
            for email in participants {
                validate::email(email)?;
            }
        }

        let real_calendar_id = self.registry.resolve(&input.calendar_id)?;
        let account_id = account_from_calendar(&real_calendar_id)?;

        let request = EventCreateRequest::new(
            account_id,
            real_calendar_id,
            input.title,
            input.start,
            input.duration,
        )
        .with_time_zone(input.time_zone)
        .all_day(input.is_all_day)
        .with_description(input.description)
        .with_locations(build_locations(input.location.as_deref(), false))
        .with_participants(build_participants(input.participants.as_deref()))
        .with_free_busy_status(input.free_busy_status)
        .with_privacy(input.privacy)
        .with_virtual_room(input.request_virtual_room);

        let created = self.client.create_event(&request).await?;

        Ok(json!({
            "success": true,
            "message": "Event created successfully.",
            "event": {
                "id": self.registry.register(&created.id),
                "calendarId": self.registry.register(&created.calendar_id),
                "accountId": self.registry.register(&created.account_id),
            },
        }))
    }
}

#[async_trait]
impl Tool for CreateEventTool {
    fn name(&self) -> &str {
        "morgen_create_event"
    }

    fn description(&self) -> &str {
        "Create a new calendar event. Times use LocalDateTime format (e.g. \
         \"2023-03-01T10:15:00\") with a separate IANA time zone; durations use ISO 8601 \
         (e.g. \"PT1H\" for 1 hour)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "calendar_id": {
                    "type": "string",
                    "description": "Virtual ID of the calendar to create the event in (from morgen_list_calendars). The owning account is derived automatically."
                },
                "title": {
                    "type": "string",
                    "description": "The event title/summary"
                },
                "start": {
                    "type": "string",
                    "description": "Start time in LocalDateTime format (e.g. \"2023-03-01T10:15:00\")"
                },
                "duration": {
                    "type": "string",
                    "description": "Duration in ISO 8601 format (e.g. \"PT1H\" for 1 hour, \"PT30M\" for 30 minutes)"
                },
                "time_zone": {
                    "type": "string",
                    "description": "IANA timezone (e.g. \"Europe/Berlin\"). Omit for floating events."
                },
                "is_all_day": {
                    "type": "boolean",
                    "description": "True for all-day events (default: false)",
                    "default": false
                },
                "description": {
                    "type": "string",
                    "description": "Optional event description"
                },
                "location": {
                    "type": "string",
                    "description": "Optional location name"
                },
                "participants": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Optional list of participant email addresses to invite"
                },
                "free_busy_status": {
                    "type": "string",
                    "enum": ["free", "busy"],
                    "description": "Availability during the event (default: \"busy\")",
                    "default": "busy"
                },
                "privacy": {
                    "type": "string",
                    "enum": ["public", "private", "secret"],
                    "description": "Event visibility (default: \"public\")",
                    "default": "public"
                },
                "request_virtual_room": {
                    "type": "string",
                    "enum": ["default", "googleMeet", "microsoftTeams"],
                    "description": "Request automatic video room creation"
                }
            },
            "required": ["calendar_id", "title", "start", "duration"]
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::new("Create Event")
            .read_only(false)
            .destructive(false)
            .open_world(true)
    }

    async fn execute(&self, input: Value) -> morgen_core::Result<ToolResult> {
        let input: CreateEventInput = serde_json::from_value(input)
            .map_err(|e| morgen_core::Error::ToolExecution(format!("Invalid input: {e}")))?;
        match self.run(input).await {
            Ok(output) => Ok(ToolResult::success(output.to_string())),
            Err(e) => Ok(ToolResult::error(e.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateEventInput {
    event_id: String,
    #[serde(flatten)]
    changes: EventChanges,
    #[serde(default)]
    series_update_mode: SeriesUpdateMode,
}

/// Update an existing calendar event
pub struct UpdateEventTool {
    client: Arc<MorgenClient>,
    registry: Arc<VirtualIdRegistry>,
}

impl UpdateEventTool {
    pub fn new(client: Arc<MorgenClient>, registry: Arc<VirtualIdRegistry>) -> Self {
        Self { client, registry }
    }

    async fn run(&self, input: UpdateEventInput) -> ToolOutcome {
        tracing::debug!(event_id = %input.event_id, "Updating event");

        let request = build_update_request(&self.registry, &input.event_id, &input.changes)?;
        self.client
            .update_event(&request, input.series_update_mode)
            .await?;

        Ok(json!({
            "success": true,
            "message": "Event updated successfully.",
            "eventId": input.event_id,
            "seriesUpdateMode": input.series_update_mode.as_str(),
        }))
    }
}

#[async_trait]
impl Tool for UpdateEventTool {
    fn name(&self) -> &str {
        "morgen_update_event"
    }

    fn description(&self) -> &str {
        "Update an existing calendar event. Only include the fields you want to change. \
         The owning account and calendar are derived from the event ID automatically. \
         When updating timing fields (start, duration, time_zone, is_all_day), all four \
         must be provided together."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "event_id": {
                    "type": "string",
                    "description": "Virtual ID of the event to update (from morgen_list_events)"
                },
                "title": {
                    "type": "string",
                    "description": "New event title"
                },
                "start": {
                    "type": "string",
                    "description": "New start time in LocalDateTime format"
                },
                "duration": {
                    "type": "string",
                    "description": "New duration in ISO 8601 format"
                },
                "time_zone": {
                    "type": "string",
                    "description": "New IANA timezone"
                },
                "is_all_day": {
                    "type": "boolean",
                    "description": "New all-day status"
                },
                "description": {
                    "type": "string",
                    "description": "New description"
                },
                "location": {
                    "type": "string",
                    "description": "New location name (set to empty string to remove)"
                },
                "free_busy_status": {
                    "type": "string",
                    "enum": ["free", "busy"],
                    "description": "New availability status"
                },
                "privacy": {
                    "type": "string",
                    "enum": ["public", "private", "secret"],
                    "description": "New privacy setting"
                },
                "series_update_mode": {
                    "type": "string",
                    "enum": ["single", "future", "all"],
                    "description": "For recurring events: update this occurrence, this and future, or the whole series (default: \"single\")",
                    "default": "single"
                }
            },
            "required": ["event_id"]
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::new("Update Event")
            .read_only(false)
            .destructive(false)
            .idempotent(true)
            .open_world(true)
    }

    async fn execute(&self, input: Value) -> morgen_core::Result<ToolResult> {
        let input: UpdateEventInput = serde_json::from_value(input)
            .map_err(|e| morgen_core::Error::ToolExecution(format!("Invalid input: {e}")))?;
        match self.run(input).await {
            Ok(output) => Ok(ToolResult::success(output.to_string())),
            Err(e) => Ok(ToolResult::error(e.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteEventInput {
    event_id: String,
    #[serde(default)]
    series_update_mode: SeriesUpdateMode,
}

/// Delete a calendar event
pub struct DeleteEventTool {
    client: Arc<MorgenClient>,
    registry: Arc<VirtualIdRegistry>,
}

impl DeleteEventTool {
    pub fn new(client: Arc<MorgenClient>, registry: Arc<VirtualIdRegistry>) -> Self {
        Self { client, registry }
    }

    async fn run(&self, input: DeleteEventInput) -> ToolOutcome {
        tracing::debug!(event_id = %input.event_id, "Deleting event");

        let real_event_id = self.registry.resolve(&input.event_id)?;
        let (account_id, calendar_id) = ids_from_event(&real_event_id)?;

        let request = EventDeleteRequest {
            id: real_event_id,
            account_id,
            calendar_id,
        };
        self.client
            .delete_event(&request, input.series_update_mode)
            .await?;

        Ok(json!({
            "success": true,
            "message": "Event deleted successfully.",
            "eventId": input.event_id,
            "seriesUpdateMode": input.series_update_mode.as_str(),
        }))
    }
}

#[async_trait]
impl Tool for DeleteEventTool {
    fn name(&self) -> &str {
        "morgen_delete_event"
    }

    fn description(&self) -> &str {
        "Delete a calendar event. The owning account and calendar are derived from the \
         event ID automatically. For recurring events, series_update_mode controls whether \
         one occurrence or the whole series is removed."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "event_id": {
                    "type": "string",
                    "description": "Virtual ID of the event to delete (from morgen_list_events)"
                },
                "series_update_mode": {
                    "type": "string",
                    "enum": ["single", "future", "all"],
                    "description": "For recurring events: delete this occurrence, this and future, or the whole series (default: \"single\")",
                    "default": "single"
                }
            },
            "required": ["event_id"]
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::new("Delete Event")
            .read_only(false)
            .destructive(true)
            .open_world(true)
    }

    async fn execute(&self, input: Value) -> morgen_core::Result<ToolResult> {
        let input: DeleteEventInput = serde_json::from_value(input)
            .map_err(|e| morgen_core::Error::ToolExecution(format!("Invalid input: {e}")))?;
        match self.run(input).await {
            Ok(output) => Ok(ToolResult::success(output.to_string())),
            Err(e) => Ok(ToolResult::error(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{register_calendar, register_event, test_context};
    use morgen_core::ids::encode_tuple;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_events_resolves_calendars_and_virtualizes_results() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);
        let (calendar_virtual, calendar_real) =
            register_calendar(&registry, "6954a6179c9d703795f281ce", "a@test.com");
        let event_real = encode_tuple(&["a@test.com", "uid1", "6954a6179c9d703795f281ce"]);

        Mock::given(method("GET"))
            .and(path("/events/list"))
            .and(query_param("accountId", "6954a6179c9d703795f281ce"))
            .and(query_param("calendarIds", &calendar_real))
            .and(query_param("start", "2023-03-01T00:00:00"))
            .and(query_param("end", "2023-03-08T00:00:00"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "events": [{
                        "id": event_real,
                        "calendarId": calendar_real,
                        "accountId": "6954a6179c9d703795f281ce",
                        "integrationId": "google",
                        "title": "Standup",
                        "start": "2023-03-01T09:00:00",
                        "duration": "PT15M",
                        "timeZone": "Europe/Berlin"
                    }]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = ListEventsTool::new(client, Arc::clone(&registry));
        let result = tool
            .execute(json!({
                "calendar_ids": [calendar_virtual],
                "start": "2023-03-01T00:00:00",
                "end": "2023-03-08T00:00:00"
            }))
            .await
            .unwrap();
        assert!(!result.is_error, "unexpected error: {}", result.output);

        let output: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(output["count"], 1);
        let event = &output["events"][0];
        let event_virtual = event["id"].as_str().unwrap();
        assert_eq!(event_virtual.len(), 7);
        assert_eq!(registry.resolve(event_virtual).unwrap(), event_real);
        assert_eq!(event["title"], "Standup");
    }

    #[tokio::test]
    async fn test_list_events_queries_all_calendars_when_omitted() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);
        let cal_one = encode_tuple(&["acc-1", "one@test.com"]);
        let cal_two = encode_tuple(&["acc-2", "two@test.com"]);

        Mock::given(method("GET"))
            .and(path("/calendars/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "calendars": [
                        {"id": cal_one, "accountId": "acc-1", "integrationId": "google"},
                        {"id": cal_two, "accountId": "acc-2", "integrationId": "o365"}
                    ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/events/list"))
            .and(query_param("accountId", "acc-1"))
            .and(query_param("calendarIds", &cal_one))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"events": [{
                    "id": encode_tuple(&["one@test.com", "u1", "acc-1"]),
                    "calendarId": cal_one,
                    "accountId": "acc-1",
                    "integrationId": "google",
                    "title": "From account one",
                    "start": "2023-03-02T10:00:00",
                    "duration": "PT1H"
                }]}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/events/list"))
            .and(query_param("accountId", "acc-2"))
            .and(query_param("calendarIds", &cal_two))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"events": [{
                    "id": encode_tuple(&["two@test.com", "u2", "acc-2"]),
                    "calendarId": cal_two,
                    "accountId": "acc-2",
                    "integrationId": "o365",
                    "title": "From account two",
                    "start": "2023-03-03T10:00:00",
                    "duration": "PT1H"
                }]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = ListEventsTool::new(client, registry);
        let result = tool
            .execute(json!({
                "start": "2023-03-01T00:00:00",
                "end": "2023-03-08T00:00:00"
            }))
            .await
            .unwrap();
        assert!(!result.is_error, "unexpected error: {}", result.output);

        let output: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(output["count"], 2);
        let titles: Vec<&str> = output["events"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap())
            .collect();
        assert!(titles.contains(&"From account one"));
        assert!(titles.contains(&"From account two"));
    }

    #[tokio::test]
    async fn test_list_events_rejects_reversed_range_before_http() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);

        let tool = ListEventsTool::new(client, registry);
        let result = tool
            .execute(json!({
                "start": "2023-03-08T00:00:00",
                "end": "2023-03-01T00:00:00"
            }))
            .await
            .unwrap();
        assert!(result.is_error);
        assert!(result.output.starts_with("Validation error:"));
        assert!(result.output.contains("must be after"));
    }

    #[tokio::test]
    async fn test_list_events_unknown_calendar_id_gives_guidance() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);

        let tool = ListEventsTool::new(client, registry);
        let result = tool
            .execute(json!({
                "calendar_ids": ["zzzzzzz"],
                "start": "2023-03-01T00:00:00",
                "end": "2023-03-08T00:00:00"
            }))
            .await
            .unwrap();
        assert!(result.is_error);
        assert_eq!(
            result.output,
            "ID 'zzzzzzz' not found. Call list_accounts, list_calendars, or list_events first."
        );
    }

    #[tokio::test]
    async fn test_create_event_sends_real_ids_and_virtualizes_response() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);
        let (calendar_virtual, calendar_real) =
            register_calendar(&registry, "6954a6179c9d703795f281ce", "a@test.com");
        let created_real = encode_tuple(&["a@test.com", "new-uid", "6954a6179c9d703795f281ce"]);

        Mock::given(method("POST"))
            .and(path("/events/create"))
            .and(body_json(json!({
                "accountId": "6954a6179c9d703795f281ce",
                "calendarId": calendar_real,
                "title": "Planning",
                "start": "2023-03-01T10:15:00",
                "duration": "PT1H",
                "timeZone": "Europe/Berlin",
                "showWithoutTime": false,
                "freeBusyStatus": "busy",
                "privacy": "public"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "event": {
                        "id": created_real,
                        "calendarId": calendar_real,
                        "accountId": "6954a6179c9d703795f281ce"
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = CreateEventTool::new(client, Arc::clone(&registry));
        let result = tool
            .execute(json!({
                "calendar_id": calendar_virtual,
                "title": "Planning",
                "start": "2023-03-01T10:15:00",
                "duration": "PT1H",
                "time_zone": "Europe/Berlin"
            }))
            .await
            .unwrap();
        assert!(!result.is_error, "unexpected error: {}", result.output);

        let output: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(output["success"], true);
        assert_eq!(output["message"], "Event created successfully.");
        let event_virtual = output["event"]["id"].as_str().unwrap();
        assert_eq!(registry.resolve(event_virtual).unwrap(), created_real);
    }

    #[tokio::test]
    async fn test_create_event_builds_locations_and_participants() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);
        let (calendar_virtual, calendar_real) =
            register_calendar(&registry, "acc-1", "me@test.com");

        Mock::given(method("POST"))
            .and(path("/events/create"))
            .and(body_json(json!({
                "accountId": "acc-1",
                "calendarId": calendar_real,
                "title": "Dinner",
                "start": "2023-03-01T19:00:00",
                "duration": "PT2H",
                "showWithoutTime": false,
                "locations": {"1": {"@type": "Location", "name": "Luigi's"}},
                "participants": {
                    "jane@example.com": {
                        "@type": "Participant",
                        "name": "jane",
                        "email": "jane@example.com",
                        "roles": {"attendee": true, "owner": false},
                        "accountOwner": false,
                        "participationStatus": "needs-action"
                    }
                },
                "freeBusyStatus": "busy",
                "privacy": "public"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"event": {"id": "e", "calendarId": "c", "accountId": "a"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = CreateEventTool::new(client, registry);
        let result = tool
            .execute(json!({
                "calendar_id": calendar_virtual,
                "title": "Dinner",
                "start": "2023-03-01T19:00:00",
                "duration": "PT2H",
                "location": "Luigi's",
                "participants": ["jane@example.com"]
            }))
            .await
            .unwrap();
        assert!(!result.is_error, "unexpected error: {}", result.output);
    }

    #[tokio::test]
    async fn test_create_event_rejects_bad_email_before_http() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);
        let (calendar_virtual, _) = register_calendar(&registry, "acc-1", "me@test.com");

        let tool = CreateEventTool::new(client, registry);
        let result = tool
            .execute(json!({
                "calendar_id": calendar_virtual,
                "title": "Dinner",
                "start": "2023-03-01T19:00:00",
                "duration": "PT2H",
                "participants": ["not-an-email"]
            }))
            .await
            .unwrap();
        assert!(result.is_error);
        assert!(result.output.starts_with("Validation error:"));
    }

    #[tokio::test]
    async fn test_update_event_reconstructs_calendar_id_from_event_id() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);
        let (event_virtual, event_real) =
            register_event(&registry, "a@test.com", "uid1", "6954a6179c9d703795f281ce");
        let expected_calendar = encode_tuple(&["6954a6179c9d703795f281ce", "a@test.com"]);

        Mock::given(method("POST"))
            .and(path("/events/update"))
            .and(query_param("seriesUpdateMode", "single"))
            .and(body_json(json!({
                "id": event_real,
                "accountId": "6954a6179c9d703795f281ce",
                "calendarId": expected_calendar,
                "title": "Renamed"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = UpdateEventTool::new(client, registry);
        let result = tool
            .execute(json!({"event_id": event_virtual, "title": "Renamed"}))
            .await
            .unwrap();
        assert!(!result.is_error, "unexpected error: {}", result.output);

        let output: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(output["eventId"], event_virtual);
        assert_eq!(output["seriesUpdateMode"], "single");
    }

    #[tokio::test]
    async fn test_update_event_requires_all_timing_fields() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);
        let (event_virtual, _) = register_event(&registry, "a@test.com", "uid1", "acc-1");

        let tool = UpdateEventTool::new(client, registry);
        let result = tool
            .execute(json!({"event_id": event_virtual, "start": "2023-03-01T10:00:00"}))
            .await
            .unwrap();
        assert!(result.is_error);
        assert_eq!(
            result.output,
            "When updating timing fields (start, duration, time_zone, is_all_day), all four \
             must be provided together."
        );
    }

    #[tokio::test]
    async fn test_update_event_empty_location_removes_locations() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);
        let (event_virtual, event_real) = register_event(&registry, "a@test.com", "uid1", "acc-1");

        Mock::given(method("POST"))
            .and(path("/events/update"))
            .and(body_json(json!({
                "id": event_real,
                "accountId": "acc-1",
                "calendarId": encode_tuple(&["acc-1", "a@test.com"]),
                "locations": {}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = UpdateEventTool::new(client, registry);
        let result = tool
            .execute(json!({"event_id": event_virtual, "location": ""}))
            .await
            .unwrap();
        assert!(!result.is_error, "unexpected error: {}", result.output);
    }

    #[tokio::test]
    async fn test_delete_event_sends_series_mode() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);
        let (event_virtual, event_real) = register_event(&registry, "a@test.com", "uid1", "acc-1");

        Mock::given(method("POST"))
            .and(path("/events/delete"))
            .and(query_param("seriesUpdateMode", "all"))
            .and(body_json(json!({
                "id": event_real,
                "accountId": "acc-1",
                "calendarId": encode_tuple(&["acc-1", "a@test.com"])
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = DeleteEventTool::new(client, registry);
        let result = tool
            .execute(json!({"event_id": event_virtual, "series_update_mode": "all"}))
            .await
            .unwrap();
        assert!(!result.is_error, "unexpected error: {}", result.output);

        let output: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(output["success"], true);
        assert_eq!(output["seriesUpdateMode"], "all");
    }

    #[tokio::test]
    async fn test_delete_event_unknown_id_gives_guidance() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);

        let tool = DeleteEventTool::new(client, registry);
        let result = tool
            .execute(json!({"event_id": "unknown"}))
            .await
            .unwrap();
        assert!(result.is_error);
        assert_eq!(
            result.output,
            "ID 'unknown' not found. Call list_accounts, list_calendars, or list_events first."
        );
    }
}
