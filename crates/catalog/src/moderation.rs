//! Admin-driven status transitions.
//!
//! Callers must already hold moderation authority; this workflow does not
//! check it. Approval stamps `publish_date`; rejection keeps whatever was
//! set before.

use std::sync::Arc;

use designhub_core::catalog::TemplateStatus;
use designhub_core::moderation::validate_moderation_target;
use designhub_core::types::DbId;
use designhub_db::models::template::Template;
use designhub_events::{event_types, CatalogEvent, EventBus};
use serde_json::json;

use crate::error::{CatalogError, CatalogResult};
use crate::store::TemplateStore;

pub struct ModerationWorkflow {
    store: Arc<dyn TemplateStore>,
    events: Arc<EventBus>,
}

impl ModerationWorkflow {
    pub fn new(store: Arc<dyn TemplateStore>, events: Arc<EventBus>) -> Self {
        Self { store, events }
    }

    /// Move a template to `approved` or `rejected`.
    ///
    /// Any other target is a validation error. A missing or soft-deleted
    /// template is `NotFound`.
    pub async fn set_status(&self, id: DbId, status: TemplateStatus) -> CatalogResult<Template> {
        validate_moderation_target(status)?;

        let template = self
            .store
            .set_status(id, status)
            .await?
            .ok_or_else(|| CatalogError::not_found(id))?;

        tracing::info!(template_id = id, status = %status, "Template moderated");

        let event_type = match status {
            TemplateStatus::Approved => event_types::TEMPLATE_APPROVED,
            _ => event_types::TEMPLATE_REJECTED,
        };
        self.events.publish(
            CatalogEvent::new(event_type)
                .with_template(id)
                .with_payload(json!({ "publish_date": template.publish_date })),
        );

        Ok(template)
    }
}
