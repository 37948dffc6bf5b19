//! morgen-core: Morgen MCP Core Library
//!
//! 識別子仮想化レイヤー（レジストリ + 複合IDコーデック）、
//! ツールシステム、設定、入力検証のコア機能を提供します。

pub mod config;
pub mod error;
pub mod ids;
pub mod tool;
pub mod validate;

pub use config::Config;
pub use error::{Error, Result};
pub use ids::{CalendarIdParts, EventIdParts, IdError, VirtualIdRegistry};
pub use tool::{Tool, ToolAnnotations, ToolDefinition, ToolManager, ToolResult};
