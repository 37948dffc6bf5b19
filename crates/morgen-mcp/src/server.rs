//! MCP protocol adapter
//!
//! Exposes the registered tools over the Model Context Protocol,
//! translating between rmcp wire types and the crate's own tool
//! definitions.

use std::borrow::Cow;
use std::sync::Arc;

use morgen_core::{ToolDefinition, ToolManager};
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ErrorData, Implementation, JsonObject,
    ListToolsResult, PaginatedRequestParams, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use serde_json::Value;

const INSTRUCTIONS: &str = "\
Morgen Calendar MCP Server provides access to Morgen's unified calendar API.

All IDs are 7-character virtual IDs (e.g., \"aB-9xZ_\") for token efficiency.

Workflow:
1. Use list_calendars to discover available calendars
2. Use list_events with calendar_ids to get events
3. Use update_event or delete_event with just event_id
4. Use batch_delete_events or batch_update_events for bulk operations

Simplified signatures:
- create_event: just calendar_id (account derived automatically)
- update_event/delete_event: just event_id (account/calendar derived automatically)
- list_events: optional calendar_ids (queries all if omitted)

Important notes:
- Times are in LocalDateTime format (e.g., \"2023-03-01T10:15:00\") with separate time_zone
- Durations use ISO 8601 format (e.g., \"PT1H\" for 1 hour, \"PT30M\" for 30 minutes)
- For recurring events, use series_update_mode to control how updates affect the series";

/// MCP server handler backed by the tool manager
#[derive(Clone)]
pub struct MorgenServer {
    tools: Arc<ToolManager>,
}

impl MorgenServer {
    pub fn new(tools: Arc<ToolManager>) -> Self {
        Self { tools }
    }

    fn tool_listing(&self) -> Vec<rmcp::model::Tool> {
        let mut definitions = self.tools.definitions();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions.into_iter().map(to_wire_tool).collect()
    }

    async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = arguments
            .map(Value::Object)
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        let result = self
            .tools
            .execute(name, input)
            .await
            .map_err(|e| ErrorData::invalid_params(e.to_string(), None))?;
        if result.is_error {
            Ok(CallToolResult::error(vec![Content::text(result.output)]))
        } else {
            Ok(CallToolResult::success(vec![Content::text(result.output)]))
        }
    }
}

fn to_wire_tool(definition: ToolDefinition) -> rmcp::model::Tool {
    let schema = definition
        .input_schema
        .as_object()
        .cloned()
        .unwrap_or_default();
    let annotations = rmcp::model::ToolAnnotations {
        title: definition.annotations.title,
        read_only_hint: definition.annotations.read_only_hint,
        destructive_hint: definition.annotations.destructive_hint,
        idempotent_hint: definition.annotations.idempotent_hint,
        open_world_hint: definition.annotations.open_world_hint,
    };
    rmcp::model::Tool {
        name: Cow::Owned(definition.name),
        title: None,
        description: Some(Cow::Owned(definition.description)),
        input_schema: Arc::new(schema),
        output_schema: None,
        annotations: Some(annotations),
        execution: None,
        icons: None,
        meta: None,
    }
}

impl ServerHandler for MorgenServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "morgen-mcp".to_string(),
                title: Some("Morgen Calendar MCP server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(INSTRUCTIONS.to_string()),
            ..ServerInfo::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            meta: None,
            tools: self.tool_listing(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::debug!(tool = %request.name, "Tool call received");
        self.dispatch(&request.name, request.arguments).await
    }
}
