//! Shared fixtures for tool tests

use std::sync::Arc;

use morgen_api::MorgenClient;
use morgen_core::ids::encode_tuple;
use morgen_core::{Config, VirtualIdRegistry};
use wiremock::MockServer;

pub(crate) fn test_context(server: &MockServer) -> (Arc<MorgenClient>, Arc<VirtualIdRegistry>) {
    let config = Config::new("test-key", server.uri());
    let client = Arc::new(MorgenClient::new(&config).unwrap());
    (client, Arc::new(VirtualIdRegistry::new()))
}

/// Register a composite calendar identifier; returns (virtual, real)
pub(crate) fn register_calendar(
    registry: &VirtualIdRegistry,
    account_id: &str,
    calendar_email: &str,
) -> (String, String) {
    let real_id = encode_tuple(&[account_id, calendar_email]);
    let virtual_id = registry.register(&real_id);
    (virtual_id, real_id)
}

/// Register a composite event identifier; returns (virtual, real)
pub(crate) fn register_event(
    registry: &VirtualIdRegistry,
    calendar_email: &str,
    event_uid: &str,
    account_id: &str,
) -> (String, String) {
    let real_id = encode_tuple(&[calendar_email, event_uid, account_id]);
    let virtual_id = registry.register(&real_id);
    (virtual_id, real_id)
}
