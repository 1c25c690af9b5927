//! Store-change event payload
//!
//! Every committed mutation is published on the change bus so live views can
//! re-query without manual cross-component refresh calls. Versions increase
//! monotonically per resource; a subscriber that sees version N can discard
//! any buffered event for the same resource with a lower version.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What happened to the resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

/// A committed change to one record of one resource (table)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Resource name, e.g. "plants", "cart", "orders"
    pub resource: String,
    pub action: ChangeAction,
    /// Record id in `"table:key"` form
    pub id: String,
    /// Monotonically increasing per-resource version
    pub version: u64,
    /// Snapshot of the record after the change (`None` for deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serde() {
        assert_eq!(
            serde_json::to_string(&ChangeAction::Created).unwrap(),
            "\"created\""
        );
        let action: ChangeAction = serde_json::from_str("\"deleted\"").unwrap();
        assert_eq!(action, ChangeAction::Deleted);
    }

    #[test]
    fn test_event_roundtrip() {
        let event = ChangeEvent {
            resource: "plants".into(),
            action: ChangeAction::Updated,
            id: "plants:abc".into(),
            version: 3,
            data: Some(serde_json::json!({"quantity": 4})),
        };
        let json = serde_json::to_string(&event).unwrap();
        let parsed: ChangeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.resource, "plants");
        assert_eq!(parsed.version, 3);
        assert_eq!(parsed.action, ChangeAction::Updated);
    }
}
