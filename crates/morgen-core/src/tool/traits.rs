//! Tool trait definition
//!
//! Defines the core trait for implementing tools that can be executed
//! via MCP tool calls.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::tool::ToolAnnotations;
use crate::Result;

/// Tool execution result
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Output string from tool execution
    pub output: String,
    /// Whether the execution resulted in an error
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            is_error: false,
        }
    }

    /// Create an error tool result
    pub fn error(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            is_error: true,
        }
    }
}

/// Tool trait for MCP tool calls
///
/// Implement this trait to create tools that an MCP client can discover
/// and invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name (used in MCP tool listings)
    fn name(&self) -> &str;

    /// Get the tool description (shown to the model when selecting tools)
    fn description(&self) -> &str;

    /// Get the JSON schema for the tool's input parameters
    fn input_schema(&self) -> JsonValue;

    /// Get the behavior hints advertised for this tool
    ///
    /// Defaults to no hints. Read-only and destructive tools should
    /// override this so clients can gate confirmation prompts.
    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::default()
    }

    /// Execute the tool with the given input
    ///
    /// # Arguments
    /// * `input` - JSON value containing the tool input parameters
    ///
    /// # Returns
    /// A `ToolResult` containing the output or error message
    async fn execute(&self, input: JsonValue) -> Result<ToolResult>;
}
