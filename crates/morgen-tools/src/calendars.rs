//! Calendar listing and metadata tools

use std::sync::Arc;

use async_trait::async_trait;
use morgen_api::{CalendarMetadata, CalendarUpdateRequest, MorgenClient};
use morgen_core::ids::account_from_calendar;
use morgen_core::{validate, Tool, ToolAnnotations, ToolResult, VirtualIdRegistry};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ToolError, ToolOutcome};
use crate::format::calendar_json;

/// List all calendars across connected accounts
pub struct ListCalendarsTool {
    client: Arc<MorgenClient>,
    registry: Arc<VirtualIdRegistry>,
}

impl ListCalendarsTool {
    pub fn new(client: Arc<MorgenClient>, registry: Arc<VirtualIdRegistry>) -> Self {
        Self { client, registry }
    }

    async fn run(&self) -> ToolOutcome {
        tracing::debug!("Listing calendars");

        let calendars = self.client.list_calendars().await?;
        let formatted: Vec<Value> = calendars
            .iter()
            .map(|calendar| calendar_json(&self.registry, calendar))
            .collect();

        Ok(json!({
            "calendars": formatted,
            "count": calendars.len(),
        }))
    }
}

#[async_trait]
impl Tool for ListCalendarsTool {
    fn name(&self) -> &str {
        "morgen_list_calendars"
    }

    fn description(&self) -> &str {
        "List all calendars across connected calendar accounts. Returns calendars with \
         their virtual IDs, names, colors, and permissions. Use this to discover available \
         calendars before listing events."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::new("List Calendars")
            .read_only(true)
            .open_world(true)
    }

    async fn execute(&self, _input: Value) -> morgen_core::Result<ToolResult> {
        match self.run().await {
            Ok(output) => Ok(ToolResult::success(output.to_string())),
            Err(e) => Ok(ToolResult::error(e.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateCalendarMetadataInput {
    calendar_id: String,
    #[serde(default)]
    busy: Option<bool>,
    #[serde(default)]
    override_color: Option<String>,
    #[serde(default)]
    override_name: Option<String>,
}

/// Update Morgen-specific metadata for a calendar
pub struct UpdateCalendarMetadataTool {
    client: Arc<MorgenClient>,
    registry: Arc<VirtualIdRegistry>,
}

impl UpdateCalendarMetadataTool {
    pub fn new(client: Arc<MorgenClient>, registry: Arc<VirtualIdRegistry>) -> Self {
        Self { client, registry }
    }

    async fn run(&self, input: UpdateCalendarMetadataInput) -> ToolOutcome {
        tracing::debug!(calendar_id = %input.calendar_id, "Updating calendar metadata");

        if input.busy.is_none() && input.override_color.is_none() && input.override_name.is_none()
        {
            return Err(ToolError::invalid_input(
                "At least one of busy, override_color, or override_name must be provided.",
            ));
        }

        if let Some(color) = &input.override_color {
            validate::hex_color(color)?;
        }

        let real_calendar_id = self.registry.resolve(&input.calendar_id)?;
        let real_account_id = account_from_calendar(&real_calendar_id)?;

        let request = CalendarUpdateRequest {
            id: real_calendar_id,
            account_id: real_account_id,
            metadata: CalendarMetadata {
                busy: input.busy,
                override_color: input.override_color.clone(),
                override_name: input.override_name.clone(),
            },
        };
        self.client.update_calendar(&request).await?;

        Ok(json!({
            "success": true,
            "message": "Calendar metadata updated successfully.",
            "updated": {
                "calendarId": input.calendar_id,
                "busy": input.busy,
                "overrideColor": input.override_color,
                "overrideName": input.override_name,
            },
        }))
    }
}

#[async_trait]
impl Tool for UpdateCalendarMetadataTool {
    fn name(&self) -> &str {
        "morgen_update_calendar_metadata"
    }

    fn description(&self) -> &str {
        "Update Morgen-specific metadata for a calendar. This customizes how a calendar \
         appears in Morgen without modifying the underlying calendar provider."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "calendar_id": {
                    "type": "string",
                    "description": "The 7-character virtual ID of the calendar to update (from morgen_list_calendars)"
                },
                "busy": {
                    "type": "boolean",
                    "description": "Whether events from this calendar count toward availability"
                },
                "override_color": {
                    "type": "string",
                    "description": "Custom color for the calendar (hex format, e.g. \"#ff0000\")"
                },
                "override_name": {
                    "type": "string",
                    "description": "Custom display name for the calendar"
                }
            },
            "required": ["calendar_id"]
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::new("Update Calendar Metadata")
            .read_only(false)
            .destructive(false)
            .idempotent(true)
            .open_world(true)
    }

    async fn execute(&self, input: Value) -> morgen_core::Result<ToolResult> {
        let input: UpdateCalendarMetadataInput = serde_json::from_value(input)
            .map_err(|e| morgen_core::Error::ToolExecution(format!("Invalid input: {e}")))?;
        match self.run(input).await {
            Ok(output) => Ok(ToolResult::success(output.to_string())),
            Err(e) => Ok(ToolResult::error(e.to_string())),
        }
    }
}
