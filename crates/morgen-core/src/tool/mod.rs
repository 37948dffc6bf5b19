//! Tool system for MCP tool calls
//!
//! This module provides the tool system for executing tools requested
//! by an MCP client.

pub mod definition;
pub mod manager;
pub mod traits;

pub use definition::{ToolAnnotations, ToolDefinition};
pub use manager::ToolManager;
pub use traits::{Tool, ToolResult};
