//! Catalog event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`CatalogEvent`]: the event envelope.
//! - [`event_types`]: the event names the catalog publishes.

pub mod bus;

pub use bus::{event_types, CatalogEvent, EventBus};
