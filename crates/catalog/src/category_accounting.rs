//! Product-count bookkeeping on the category subsystem.
//!
//! Each successful create issues one increment, each successful soft delete
//! one decrement, and a category change on update moves the count. Calls
//! are attempted inline in the triggering request and never fail it.

use std::sync::Arc;

use designhub_core::types::DbId;
use designhub_events::EventBus;

use crate::collaborators::CategoryDirectory;
use crate::side_effects::{best_effort, effects};

pub struct CategoryAccounting {
    categories: Arc<dyn CategoryDirectory>,
    events: Arc<EventBus>,
}

impl CategoryAccounting {
    pub fn new(categories: Arc<dyn CategoryDirectory>, events: Arc<EventBus>) -> Self {
        Self { categories, events }
    }

    pub async fn record_created(&self, template_id: DbId, category_id: DbId) {
        let ok = best_effort(
            &self.events,
            effects::CATEGORY_INCREMENT,
            template_id,
            self.categories.increment_product_count(category_id),
        )
        .await;
        if ok {
            tracing::debug!(template_id, category_id, "Category product count incremented");
        }
    }

    pub async fn record_removed(&self, template_id: DbId, category_id: DbId) {
        let ok = best_effort(
            &self.events,
            effects::CATEGORY_DECREMENT,
            template_id,
            self.categories.decrement_product_count(category_id),
        )
        .await;
        if ok {
            tracing::debug!(template_id, category_id, "Category product count decremented");
        }
    }

    /// Move one product from `from` to `to`. No-op when they are equal.
    pub async fn record_moved(&self, template_id: DbId, from: DbId, to: DbId) {
        if from == to {
            return;
        }
        self.record_removed(template_id, from).await;
        self.record_created(template_id, to).await;
    }
}
