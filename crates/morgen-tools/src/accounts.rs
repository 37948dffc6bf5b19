//! Account listing tool

use std::sync::Arc;

use async_trait::async_trait;
use morgen_api::MorgenClient;
use morgen_core::{Tool, ToolAnnotations, ToolResult, VirtualIdRegistry};
use serde_json::{json, Value};

use crate::error::ToolOutcome;
use crate::format::account_json;

/// List all connected calendar accounts
pub struct ListAccountsTool {
    client: Arc<MorgenClient>,
    registry: Arc<VirtualIdRegistry>,
}

impl ListAccountsTool {
    pub fn new(client: Arc<MorgenClient>, registry: Arc<VirtualIdRegistry>) -> Self {
        Self { client, registry }
    }

    async fn run(&self) -> ToolOutcome {
        tracing::debug!("Listing accounts");

        let accounts = self.client.list_accounts().await?;
        let formatted: Vec<Value> = accounts
            .iter()
            .map(|account| account_json(&self.registry, account))
            .collect();

        Ok(json!({
            "accounts": formatted,
            "count": accounts.len(),
        }))
    }
}

#[async_trait]
impl Tool for ListAccountsTool {
    fn name(&self) -> &str {
        "morgen_list_accounts"
    }

    fn description(&self) -> &str {
        "List all connected calendar accounts. Returns accounts with their virtual IDs, \
         integration types, and user info. Use this to discover available accounts before \
         performing calendar operations."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::new("List Accounts")
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
