//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! The catalog publishes a [`CatalogEvent`] for every lifecycle change and
//! for every best-effort side effect that failed, so non-fatal failures are
//! observable by subscribers (audit sinks, tests) instead of disappearing
//! into the log.

use chrono::{DateTime, Utc};
use designhub_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event names published by the catalog services.
pub mod event_types {
    pub const TEMPLATE_CREATED: &str = "template.created";
    pub const TEMPLATE_UPDATED: &str = "template.updated";
    pub const TEMPLATE_DELETED: &str = "template.deleted";
    pub const TEMPLATE_APPROVED: &str = "template.approved";
    pub const TEMPLATE_REJECTED: &str = "template.rejected";
    pub const TEMPLATE_LIKED: &str = "template.liked";
    pub const TEMPLATE_UNLIKED: &str = "template.unliked";
    /// A best-effort collaborator call failed and was swallowed.
    pub const SIDE_EFFECT_FAILED: &str = "side_effect.failed";
}

// ---------------------------------------------------------------------------
// CatalogEvent
// ---------------------------------------------------------------------------

/// Something that happened to a catalog template.
///
/// Constructed via [`CatalogEvent::new`] and enriched with
/// [`with_template`](CatalogEvent::with_template),
/// [`with_actor`](CatalogEvent::with_actor), and
/// [`with_payload`](CatalogEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEvent {
    /// Dot-separated event name, one of [`event_types`].
    pub event_type: String,

    pub template_id: Option<DbId>,

    /// Id of the user that triggered the event.
    pub actor_user_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl CatalogEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            template_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_template(mut self, template_id: DbId) -> Self {
        self.template_id = Some(template_id);
        self
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Whether this event records a swallowed side-effect failure.
    pub fn is_side_effect_failure(&self) -> bool {
        self.event_type == event_types::SIDE_EFFECT_FAILED
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use designhub_events::bus::{event_types, CatalogEvent, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(CatalogEvent::new(event_types::TEMPLATE_CREATED).with_template(1));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<CatalogEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is dropped.
    pub fn publish(&self, event: CatalogEvent) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
