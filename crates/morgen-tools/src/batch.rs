//! Bulk event operations
//!
//! Both tools resolve and validate every item before any request is sent,
//! so a single bad identifier fails the whole call instead of leaving a
//! half-applied batch. Upstream requests then fan out with bounded
//! concurrency and per-item failures are reported instead of aborting.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use morgen_api::{EventDeleteRequest, EventUpdateRequest, MorgenClient, SeriesUpdateMode};
use morgen_core::ids::ids_from_event;
use morgen_core::{Tool, ToolAnnotations, ToolResult, VirtualIdRegistry};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ToolError, ToolOutcome};
use crate::events::{build_update_request, EventChanges};

/// Upstream requests in flight at once during a batch
const MAX_CONCURRENT_REQUESTS: usize = 4;

fn aggregate(results: Vec<Value>) -> Value {
    let succeeded = results.iter().filter(|r| r["success"] == true).count();
    let failed = results.len() - succeeded;
    json!({
        "results": results,
        "succeeded": succeeded,
        "failed": failed,
    })
}

#[derive(Debug, Deserialize)]
struct BatchDeleteEventsInput {
    event_ids: Vec<String>,
}

/// Delete many events in one call
pub struct BatchDeleteEventsTool {
    client: Arc<MorgenClient>,
    registry: Arc<VirtualIdRegistry>,
}

impl BatchDeleteEventsTool {
    pub fn new(client: Arc<MorgenClient>, registry: Arc<VirtualIdRegistry>) -> Self {
        Self { client, registry }
    }

    async fn run(&self, input: BatchDeleteEventsInput) -> ToolOutcome {
        tracing::debug!(count = input.event_ids.len(), "Batch deleting events");

        if input.event_ids.is_empty() {
            return Err(ToolError::invalid_input("event_ids cannot be empty"));
        }

        let mut requests = Vec::with_capacity(input.event_ids.len());
        for event_id in &input.event_ids {
            let real_event_id = self.registry.resolve(event_id)?;
            let (account_id, calendar_id) = ids_from_event(&real_event_id)?;
            requests.push((
                event_id.clone(),
                EventDeleteRequest {
                    id: real_event_id,
                    account_id,
                    calendar_id,
                },
            ));
        }

        let client = &self.client;
        let results: Vec<Value> = stream::iter(requests)
            .map(|(event_id, request)| async move {
                match client.delete_event(&request, SeriesUpdateMode::Single).await {
                    Ok(()) => json!({"eventId": event_id, "success": true}),
                    Err(e) => json!({
                        "eventId": event_id,
                        "success": false,
                        "error": ToolError::from(e).to_string(),
                    }),
                }
            })
            .buffered(MAX_CONCURRENT_REQUESTS)
            .collect()
            .await;

        Ok(aggregate(results))
    }
}

#[async_trait]
impl Tool for BatchDeleteEventsTool {
    fn name(&self) -> &str {
        "morgen_batch_delete_events"
    }

    fn description(&self) -> &str {
        "Delete multiple calendar events in one call. All event IDs are resolved and \
         validated before any deletion starts; individual deletions that fail afterwards \
         are reported per event without aborting the rest."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "event_ids": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Virtual IDs of the events to delete (from morgen_list_events)"
                }
            },
            "required": ["event_ids"]
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::new("Batch Delete Events")
            .read_only(false)
            .destructive(true)
            .open_world(true)
    }

    async fn execute(&self, input: Value) -> morgen_core::Result<ToolResult> {
        let input: BatchDeleteEventsInput = serde_json::from_value(input)
            .map_err(|e| morgen_core::Error::ToolExecution(format!("Invalid input: {e}")))?;
        match self.run(input).await {
            Ok(output) => Ok(ToolResult::success(output.to_string())),
            Err(e) => Ok(ToolResult::error(e.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BatchUpdateItem {
    event_id: String,
    #[serde(flatten)]
    changes: EventChanges,
}

#[derive(Debug, Deserialize)]
struct BatchUpdateEventsInput {
    updates: Vec<BatchUpdateItem>,
}

/// Update many events in one call
pub struct BatchUpdateEventsTool {
    client: Arc<MorgenClient>,
    registry: Arc<VirtualIdRegistry>,
}

impl BatchUpdateEventsTool {
    pub fn new(client: Arc<MorgenClient>, registry: Arc<VirtualIdRegistry>) -> Self {
        Self { client, registry }
    }

    async fn run(&self, input: BatchUpdateEventsInput) -> ToolOutcome {
        tracing::debug!(count = input.updates.len(), "Batch updating events");

        if input.updates.is_empty() {
            return Err(ToolError::invalid_input("updates cannot be empty"));
        }

        let mut requests: Vec<(String, EventUpdateRequest)> =
            Vec::with_capacity(input.updates.len());
        for item in &input.updates {
            let request = build_update_request(&self.registry, &item.event_id, &item.changes)?;
            requests.push((item.event_id.clone(), request));
        }

        let client = &self.client;
        let results: Vec<Value> = stream::iter(requests)
            .map(|(event_id, request)| async move {
                match client.update_event(&request, SeriesUpdateMode::Single).await {
                    Ok(()) => json!({"eventId": event_id, "success": true}),
                    Err(e) => json!({
                        "eventId": event_id,
                        "success": false,
                        "error": ToolError::from(e).to_string(),
                    }),
                }
            })
            .buffered(MAX_CONCURRENT_REQUESTS)
            .collect()
            .await;

        Ok(aggregate(results))
    }
}

#[async_trait]
impl Tool for BatchUpdateEventsTool {
    fn name(&self) -> &str {
        "morgen_batch_update_events"
    }

    fn description(&self) -> &str {
        "Update multiple calendar events in one call. Each item takes the same fields as \
         morgen_update_event. All items are resolved and validated before any update \
         starts; individual updates that fail afterwards are reported per event without \
         aborting the rest."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "updates": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "event_id": {
                                "type": "string",
                                "description": "Virtual ID of the event to update"
                            },
                            "title": {"type": "string"},
                            "start": {
                                "type": "string",
                                "description": "New start time in LocalDateTime format"
                            },
                            "duration": {
                                "type": "string",
                                "description": "New duration in ISO 8601 format"
                            },
                            "time_zone": {"type": "string"},
                            "is_all_day": {"type": "boolean"},
                            "description": {"type": "string"},
                            "location": {
                                "type": "string",
                                "description": "New location name (set to empty string to remove)"
                            },
                            "free_busy_status": {"type": "string", "enum": ["free", "busy"]},
                            "privacy": {"type": "string", "enum": ["public", "private", "secret"]}
                        },
                        "required": ["event_id"]
                    },
                    "description": "Updates to apply, one object per event"
                }
            },
            "required": ["updates"]
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::new("Batch Update Events")
            .read_only(false)
            .destructive(false)
            .idempotent(false)
            .open_world(true)
    }

    async fn execute(&self, input: Value) -> morgen_core::Result<ToolResult> {
        let input: BatchUpdateEventsInput = serde_json::from_value(input)
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
    use crate::testutil::{register_event, test_context};
    use morgen_core::ids::encode_tuple;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_batch_delete_rejects_empty_list() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);

        let tool = BatchDeleteEventsTool::new(client, registry);
        let result = tool.execute(json!({"event_ids": []})).await.unwrap();
        assert!(result.is_error);
        assert_eq!(result.output, "event_ids cannot be empty");
    }

    #[tokio::test]
    async fn test_batch_delete_unknown_id_fails_whole_call_before_http() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);
        let (known_virtual, _) = register_event(&registry, "a@test.com", "uid1", "acc-1");

        Mock::given(method("POST"))
            .and(path("/events/delete"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(0)
            .mount(&server)
            .await;

        let tool = BatchDeleteEventsTool::new(client, registry);
        let result = tool
            .execute(json!({"event_ids": [known_virtual, "zzzzzzz"]}))
            .await
            .unwrap();
        assert!(result.is_error);
        assert_eq!(
            result.output,
            "ID 'zzzzzzz' not found. Call list_accounts, list_calendars, or list_events first."
        );
    }

    #[tokio::test]
    async fn test_batch_delete_reports_per_event_failures() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);
        let (v1, r1) = register_event(&registry, "a@test.com", "uid1", "acc-1");
        let (v2, r2) = register_event(&registry, "a@test.com", "uid2", "acc-1");
        let calendar_real = encode_tuple(&["acc-1", "a@test.com"]);

        Mock::given(method("POST"))
            .and(path("/events/delete"))
            .and(body_json(json!({
                "id": r1,
                "accountId": "acc-1",
                "calendarId": calendar_real
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/events/delete"))
            .and(body_json(json!({
                "id": r2,
                "accountId": "acc-1",
                "calendarId": calendar_real
            })))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let tool = BatchDeleteEventsTool::new(client, registry);
        let result = tool
            .execute(json!({"event_ids": [v1, v2]}))
            .await
            .unwrap();
        assert!(!result.is_error, "unexpected error: {}", result.output);

        let output: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(output["succeeded"], 1);
        assert_eq!(output["failed"], 1);
        let results = output["results"].as_array().unwrap();
        assert_eq!(results[0]["eventId"], v1);
        assert_eq!(results[0]["success"], true);
        assert_eq!(results[1]["eventId"], v2);
        assert_eq!(results[1]["success"], false);
        assert_eq!(results[1]["error"], "API error (HTTP 500): API error: boom");
    }

    #[tokio::test]
    async fn test_batch_update_validates_all_items_before_http() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);
        let (v1, _) = register_event(&registry, "a@test.com", "uid1", "acc-1");
        let (v2, _) = register_event(&registry, "a@test.com", "uid2", "acc-1");

        Mock::given(method("POST"))
            .and(path("/events/update"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(0)
            .mount(&server)
            .await;

        let tool = BatchUpdateEventsTool::new(client, registry);
        let result = tool
            .execute(json!({"updates": [
                {"event_id": v1, "title": "Fine"},
                {"event_id": v2, "start": "2023-03-01T10:00:00"}
            ]}))
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
    async fn test_batch_update_applies_all_items() {
        let server = MockServer::start().await;
        let (client, registry) = test_context(&server);
        let (v1, r1) = register_event(&registry, "a@test.com", "uid1", "acc-1");
        let (v2, r2) = register_event(&registry, "a@test.com", "uid2", "acc-1");
        let calendar_real = encode_tuple(&["acc-1", "a@test.com"]);

        Mock::given(method("POST"))
            .and(path("/events/update"))
            .and(query_param("seriesUpdateMode", "single"))
            .and(body_json(json!({
                "id": r1,
                "accountId": "acc-1",
                "calendarId": calendar_real,
                "title": "One"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/events/update"))
            .and(query_param("seriesUpdateMode", "single"))
            .and(body_json(json!({
                "id": r2,
                "accountId": "acc-1",
                "calendarId": calendar_real,
                "title": "Two"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = BatchUpdateEventsTool::new(client, registry);
        let result = tool
            .execute(json!({"updates": [
                {"event_id": v1, "title": "One"},
                {"event_id": v2, "title": "Two"}
            ]}))
            .await
            .unwrap();
        assert!(!result.is_error, "unexpected error: {}", result.output);

        let output: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(output["succeeded"], 2);
        assert_eq!(output["failed"], 0);
        let results = output["results"].as_array().unwrap();
        assert_eq!(results[0]["eventId"], v1);
        assert_eq!(results[1]["eventId"], v2);
    }
}
