//! Change notification
//!
//! The EventBus uses `tokio::sync::broadcast` to decouple entity mutations
//! from whoever observes them (a presentation layer, an audit log, tests).
//!
//! # Architecture
//!
//! ```text
//! entity setter ──▶ Notifier ──┐
//!                              ├──▶ EventBus::publish() ──▶ broadcast channel ──▶ subscribers
//! Store (save/delete/status) ──┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut rx = store.events().subscribe();
//!
//! let mut product = Product::new("Widget", None, Decimal::new(999, 2), 0, false);
//! product.watch(store.events());
//! product.set_name("Gadget")?;
//!
//! if let Ok(envelope) = rx.recv().await {
//!     assert_eq!(envelope.event.property(), Some("Name"));
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// How a save reached the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveKind {
    Added,
    Updated,
}

/// Events describing entity changes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StoreEvent {
    /// A validated setter committed a new value
    PropertyChanged {
        entity_type: String,
        entity_id: i32,
        property: String,
    },
    /// An entity was written through its add or update procedure
    Saved {
        entity_type: String,
        entity_id: i32,
        kind: SaveKind,
    },
    /// A lifecycle status or flag changed
    StatusChanged {
        entity_type: String,
        entity_id: i32,
        from: String,
        to: String,
    },
    /// An entity was deleted
    Deleted {
        entity_type: String,
        entity_id: i32,
    },
}

impl StoreEvent {
    /// Get the entity type this event relates to
    pub fn entity_type(&self) -> &str {
        match self {
            StoreEvent::PropertyChanged { entity_type, .. }
            | StoreEvent::Saved { entity_type, .. }
            | StoreEvent::StatusChanged { entity_type, .. }
            | StoreEvent::Deleted { entity_type, .. } => entity_type,
        }
    }

    /// Get the entity ID this event relates to
    pub fn entity_id(&self) -> i32 {
        match self {
            StoreEvent::PropertyChanged { entity_id, .. }
            | StoreEvent::Saved { entity_id, .. }
            | StoreEvent::StatusChanged { entity_id, .. }
            | StoreEvent::Deleted { entity_id, .. } => *entity_id,
        }
    }

    /// Get the action name
    pub fn action(&self) -> &str {
        match self {
            StoreEvent::PropertyChanged { .. } => "property_changed",
            StoreEvent::Saved { .. } => "saved",
            StoreEvent::StatusChanged { .. } => "status_changed",
            StoreEvent::Deleted { .. } => "deleted",
        }
    }

    /// The changed property, for property events
    pub fn property(&self) -> Option<&str> {
        match self {
            StoreEvent::PropertyChanged { property, .. } => Some(property),
            _ => None,
        }
    }
}

/// Envelope wrapping an event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: StoreEvent,
}

impl EventEnvelope {
    pub fn new(event: StoreEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// The bus is cheap to clone (Arc internally) and can be shared across threads.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// The capacity determines how many events can be buffered before
    /// slow receivers start losing events (lagged).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails. Without subscribers the event is dropped. Returns the
    /// number of receivers that will see the event.
    pub fn publish(&self, event: StoreEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// Per-entity listener slot. Detached by default; an entity starts
/// notifying once [`Notifier::attach`] gives it a bus.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    bus: Option<EventBus>,
}

impl Notifier {
    pub fn attach(&mut self, bus: &EventBus) {
        self.bus = Some(bus.clone());
    }

    pub fn detach(&mut self) {
        self.bus = None;
    }

    pub fn is_attached(&self) -> bool {
        self.bus.is_some()
    }

    pub fn property_changed(&self, entity_type: &str, entity_id: i32, property: &str) {
        if let Some(bus) = &self.bus {
            bus.publish(StoreEvent::PropertyChanged {
                entity_type: entity_type.to_string(),
                entity_id,
                property: property.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_tags_action() {
        let event = StoreEvent::Saved {
            entity_type: "product".to_string(),
            entity_id: 3,
            kind: SaveKind::Added,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "saved");
        assert_eq!(json["kind"], "added");
        assert_eq!(json["entity_id"], 3);
    }

    #[test]
    fn test_event_accessors() {
        let event = StoreEvent::StatusChanged {
            entity_type: "order".to_string(),
            entity_id: 9,
            from: "Shipping".to_string(),
            to: "Arrived".to_string(),
        };
        assert_eq!(event.entity_type(), "order");
        assert_eq!(event.entity_id(), 9);
        assert_eq!(event.action(), "status_changed");
        assert_eq!(event.property(), None);
    }

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        let receivers = bus.publish(StoreEvent::Deleted {
            entity_type: "website".to_string(),
            entity_id: 4,
        });
        assert_eq!(receivers, 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event.entity_id(), 4);
        assert_eq!(received.event.action(), "deleted");
    }

    #[test]
    fn test_event_bus_publish_without_subscribers() {
        let bus = EventBus::new(16);
        let receivers = bus.publish(StoreEvent::Deleted {
            entity_type: "website".to_string(),
            entity_id: 4,
        });
        assert_eq!(receivers, 0);
    }

    #[tokio::test]
    async fn test_notifier_publishes_only_when_attached() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let mut notifier = Notifier::default();

        notifier.property_changed("product", -1, "Name");
        assert!(rx.try_recv().is_err());

        notifier.attach(&bus);
        notifier.property_changed("product", -1, "Price");
        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.event.property(), Some("Price"));

        notifier.detach();
        assert!(!notifier.is_attached());
    }
}
