//! Best-effort side effects.
//!
//! Collaborator calls that must not decide the outcome of the primary
//! operation run through [`best_effort`]. The call is awaited inline; a
//! failure is logged at `warn` and published on the event bus as a
//! `side_effect.failed` event naming the effect and the template, then
//! dropped.

use std::future::Future;

use designhub_core::types::DbId;
use designhub_events::{event_types, CatalogEvent, EventBus};
use serde_json::json;

/// Names of the side effects the services attempt.
pub mod effects {
    pub const CATEGORY_INCREMENT: &str = "category.increment_product_count";
    pub const CATEGORY_DECREMENT: &str = "category.decrement_product_count";
    pub const WISHLIST_ADD: &str = "wishlist.add";
    pub const WISHLIST_REMOVE: &str = "wishlist.remove";
    pub const LIKE_NOTIFICATION: &str = "notification.like";
    pub const VIEW_COUNT: &str = "template.increment_view_count";
    pub const LINK_SIGNING: &str = "download.sign_link";
}

/// Await `effect` and swallow its failure. Returns whether it succeeded.
pub async fn best_effort<F>(
    events: &EventBus,
    effect: &'static str,
    template_id: DbId,
    fut: F,
) -> bool
where
    F: Future<Output = anyhow::Result<()>>,
{
    match fut.await {
        Ok(()) => true,
        Err(err) => {
            record_failure(events, effect, template_id, &err);
            false
        }
    }
}

/// Log and publish a swallowed side-effect failure.
pub fn record_failure(
    events: &EventBus,
    effect: &'static str,
    template_id: DbId,
    err: &anyhow::Error,
) {
    tracing::warn!(effect, template_id, error = %err, "Side effect failed, continuing");
    events.publish(
        CatalogEvent::new(event_types::SIDE_EFFECT_FAILED)
            .with_template(template_id)
            .with_payload(json!({
                "effect": effect,
                "error": format!("{err:#}"),
            })),
    );
}
