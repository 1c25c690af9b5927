//! Change bus
//!
//! A broadcast channel of [`ChangeEvent`]s. Publishing never blocks and
//! never fails: with no subscribers the event is dropped, and a slow
//! subscriber that overflows its buffer observes a `Lagged` error and
//! re-queries; events carry full record snapshots, so skipping ahead is
//! safe.

use dashmap::DashMap;
use serde_json::Value;
use shared::{ChangeAction, ChangeEvent};
use tokio::sync::broadcast;

/// Default capacity of the broadcast channel
const DEFAULT_CAPACITY: usize = 1024;

/// Per-resource monotonic version counters
///
/// Each resource (table) has an independent version that increments on
/// every published change, letting subscribers order events and discard
/// stale buffered ones.
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// Increment the version for a resource and return the new value
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current version for a resource, 0 if never changed
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

/// Broadcast bus for committed store changes
#[derive(Debug)]
pub struct ChangeBus {
    tx: broadcast::Sender<ChangeEvent>,
    versions: ResourceVersions,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            versions: ResourceVersions::new(),
        }
    }

    /// Subscribe to all future change events
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Publish a committed change
    ///
    /// Returns the event's per-resource version.
    pub fn publish(
        &self,
        resource: &str,
        action: ChangeAction,
        id: impl Into<String>,
        data: Option<Value>,
    ) -> u64 {
        let version = self.versions.increment(resource);
        let event = ChangeEvent {
            resource: resource.to_string(),
            action,
            id: id.into(),
            version,
            data,
        };
        // No subscribers is fine
        let _ = self.tx.send(event);
        version
    }

    /// Current version for a resource
    pub fn version(&self, resource: &str) -> u64 {
        self.versions.get(resource)
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_increment_per_resource() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("plants"), 0);
        assert_eq!(versions.increment("plants"), 1);
        assert_eq!(versions.increment("plants"), 2);
        assert_eq!(versions.increment("cart"), 1);
        assert_eq!(versions.get("plants"), 2);
    }

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let bus = ChangeBus::new();
        let mut rx = bus.subscribe();

        bus.publish("plants", ChangeAction::Updated, "plants:a", None);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.resource, "plants");
        assert_eq!(event.action, ChangeAction::Updated);
        assert_eq!(event.version, 1);
    }

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let bus = ChangeBus::new();
        assert_eq!(
            bus.publish("cart", ChangeAction::Deleted, "cart:x", None),
            1
        );
        assert_eq!(bus.version("cart"), 1);
    }
}
