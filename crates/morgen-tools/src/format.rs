//! Outward payload shaping
//!
//! Every real identifier crossing into a tool response is swapped for its
//! virtual counterpart here; these formatting paths are the only place
//! registry entries come into existence.

use morgen_api::{Account, Calendar, Event};
use morgen_core::VirtualIdRegistry;
use serde_json::{json, Value};

/// Drop `null` values and empty arrays from a JSON object's top level
///
/// Empty objects stay: a calendar whose metadata has no overrides still
/// reports `"metadata": {}`.
pub(crate) fn compact_object(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| match v {
                    Value::Null => false,
                    Value::Array(items) => !items.is_empty(),
                    _ => true,
                })
                .collect(),
        ),
        other => other,
    }
}

pub(crate) fn account_json(registry: &VirtualIdRegistry, account: &Account) -> Value {
    compact_object(json!({
        "id": registry.register(&account.id),
        "integrationId": account.integration_id,
        "email": account.provider_user_id,
        "displayName": account.provider_user_display_name,
    }))
}

pub(crate) fn calendar_json(registry: &VirtualIdRegistry, calendar: &Calendar) -> Value {
    let permissions = calendar.my_rights.as_ref().map(|rights| {
        json!({
            "canRead": rights.may_read_items,
            "canWrite": rights.may_write_all,
            "canDelete": rights.may_delete,
        })
    });
    let metadata = calendar.metadata.as_ref().map(|meta| {
        compact_object(json!({
            "busy": meta.busy,
            "overrideColor": meta.override_color,
            "overrideName": meta.override_name,
        }))
    });

    compact_object(json!({
        "id": registry.register(&calendar.id),
        "accountId": registry.register(&calendar.account_id),
        "integrationId": calendar.integration_id,
        "name": calendar.name,
        "color": calendar.color,
        "sortOrder": calendar.sort_order,
        "permissions": permissions,
        "metadata": metadata,
    }))
}

pub(crate) fn event_json(registry: &VirtualIdRegistry, event: &Event) -> Value {
    let locations: Vec<Value> = event
        .locations
        .as_ref()
        .map(|locations| {
            locations
                .values()
                .map(|location| json!({ "name": location.name }))
                .collect()
        })
        .unwrap_or_default();

    let participants: Vec<Value> = event
        .participants
        .as_ref()
        .map(|participants| {
            participants
                .values()
                .map(|p| {
                    json!({
                        "name": p.name,
                        "email": p.email,
                        "status": p.participation_status,
                        "isOrganizer": p.is_organizer(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    compact_object(json!({
        "id": registry.register(&event.id),
        "calendarId": registry.register(&event.calendar_id),
        "accountId": registry.register(&event.account_id),
        "title": event.title,
        "description": event.description,
        "start": event.start,
        "duration": event.duration,
        "timeZone": event.time_zone,
        "isAllDay": event.show_without_time,
        "status": event.free_busy_status,
        "privacy": event.privacy,
        "locations": locations,
        "participants": participants,
        "isRecurring": event.recurrence_rules.is_some(),
        "recurrenceId": event.recurrence_id,
        "masterEventId": event.master_event_id.as_deref().map(|id| registry.register(id)),
        "virtualRoomUrl": event.virtual_room_url(),
    }))
}
