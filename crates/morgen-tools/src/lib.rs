//! morgen-tools: Built-in tools for morgen-mcp
//!
//! This crate provides the callable tool surface over the Morgen calendar
//! API: account and calendar listings, calendar metadata updates, and
//! single or batch event mutations. Every tool substitutes short virtual
//! identifiers for the long composite identifiers Morgen issues.

use morgen_api::MorgenClient;
use morgen_core::{ToolManager, VirtualIdRegistry};

pub mod accounts;
pub mod calendars;
pub mod events;
pub mod batch;

mod error;
mod format;

#[cfg(test)]
pub(crate) mod testutil;

pub use accounts::ListAccountsTool;
pub use calendars::{ListCalendarsTool, UpdateCalendarMetadataTool};
pub use events::{CreateEventTool, DeleteEventTool, ListEventsTool, UpdateEventTool};
pub use batch::{BatchDeleteEventsTool, BatchUpdateEventsTool};

use std::sync::Arc;

/// Register all Morgen calendar tools with the tool manager
pub fn register_tools(
    manager: &mut ToolManager,
    client: Arc<MorgenClient>,
    registry: Arc<VirtualIdRegistry>,
) {
    manager.register(Arc::new(ListAccountsTool::new(
        Arc::clone(&client),
        Arc::clone(&registry),
    )));
    manager.register(Arc::new(ListCalendarsTool::new(
        Arc::clone(&client),
        Arc::clone(&registry),
    )));
    manager.register(Arc::new(UpdateCalendarMetadataTool::new(
        Arc::clone(&client),
        Arc::clone(&registry),
    )));
    manager.register(Arc::new(ListEventsTool::new(
        Arc::clone(&client),
        Arc::clone(&registry),
    )));
    manager.register(Arc::new(CreateEventTool::new(
        Arc::clone(&client),
        Arc::clone(&registry),
    )));
    manager.register(Arc::new(UpdateEventTool::new(
        Arc::clone(&client),
        Arc::clone(&registry),
    )));
    manager.register(Arc::new(DeleteEventTool::new(
        Arc::clone(&client),
        Arc::clone(&registry),
    )));
    manager.register(Arc::new(BatchDeleteEventsTool::new(
        Arc::clone(&client),
        Arc::clone(&registry),
    )));
    manager.register(Arc::new(BatchUpdateEventsTool::new(client, registry)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use morgen_core::Config;

    #[test]
    fn test_register_tools_registers_all_nine() {
        let config = Config::new("test-key", "https://api.morgen.so/v3");
        let client = Arc::new(MorgenClient::new(&config).unwrap());
        let registry = Arc::new(VirtualIdRegistry::new());
        let mut manager = ToolManager::new();
        register_tools(&mut manager, client, registry);

        assert_eq!(manager.len(), 9);
        for name in [
            "morgen_list_accounts",
            "morgen_list_calendars",
            "morgen_update_calendar_metadata",
            "morgen_list_events",
            "morgen_create_event",
            "morgen_update_event",
            "morgen_delete_event",
            "morgen_batch_delete_events",
            "morgen_batch_update_events",
        ] {
            assert!(manager.contains(name), "missing tool: {name}");
        }
    }
}
