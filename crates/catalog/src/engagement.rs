//! The like/unlike toggle.
//!
//! `toggle_like` reads the template, decides from `liked_by` membership
//! whether this call likes or unlikes, then applies the matching store
//! mutation. The read and the write are separate steps, so two concurrent
//! toggles by the same user can both see the same membership: the add path
//! still never duplicates a liker, but `like_count` can drift above
//! `|liked_by|`. Removal clamps `like_count` at zero.
//!
//! Wishlist and notification calls are best-effort and never undo or fail
//! the toggle.

use std::sync::Arc;

use designhub_core::types::DbId;
use designhub_db::models::template::Template;
use designhub_events::{event_types, CatalogEvent, EventBus};
use serde::Serialize;
use serde_json::json;

use crate::collaborators::{Collaborators, LikeNotification, Notifier, UserDirectory, Wishlist};
use crate::error::{CatalogError, CatalogResult};
use crate::side_effects::{best_effort, effects};
use crate::store::TemplateStore;

/// Outcome of a toggle: the caller's new membership and the stored count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeToggle {
    pub liked: bool,
    pub like_count: i64,
}

pub struct EngagementCoordinator {
    store: Arc<dyn TemplateStore>,
    users: Arc<dyn UserDirectory>,
    wishlist: Arc<dyn Wishlist>,
    notifier: Arc<dyn Notifier>,
    events: Arc<EventBus>,
}

impl EngagementCoordinator {
    pub fn new(
        store: Arc<dyn TemplateStore>,
        collaborators: &Collaborators,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            store,
            users: Arc::clone(&collaborators.users),
            wishlist: Arc::clone(&collaborators.wishlist),
            notifier: Arc::clone(&collaborators.notifier),
            events,
        }
    }

    /// Like the template if `user_id` has not liked it, otherwise unlike it.
    pub async fn toggle_like(&self, template_id: DbId, user_id: DbId) -> CatalogResult<LikeToggle> {
        let template = self
            .store
            .find_by_id(template_id)
            .await?
            .filter(|t| !t.is_deleted)
            .ok_or_else(|| CatalogError::not_found(template_id))?;

        if template.is_liked_by(user_id) {
            self.unlike(template, user_id).await
        } else {
            self.like(template, user_id).await
        }
    }

    async fn unlike(&self, template: Template, user_id: DbId) -> CatalogResult<LikeToggle> {
        let updated = self
            .store
            .remove_like(template.id, user_id)
            .await?
            .ok_or_else(|| CatalogError::not_found(template.id))?;

        best_effort(
            &self.events,
            effects::WISHLIST_REMOVE,
            template.id,
            self.wishlist.remove(user_id, template.id),
        )
        .await;

        tracing::info!(
            template_id = template.id,
            user_id,
            like_count = updated.like_count,
            "Template unliked"
        );
        self.publish(event_types::TEMPLATE_UNLIKED, &updated, user_id);

        Ok(LikeToggle {
            liked: false,
            like_count: updated.like_count,
        })
    }

    async fn like(&self, template: Template, user_id: DbId) -> CatalogResult<LikeToggle> {
        let updated = self
            .store
            .add_like(template.id, user_id)
            .await?
            .ok_or_else(|| CatalogError::not_found(template.id))?;

        best_effort(
            &self.events,
            effects::WISHLIST_ADD,
            template.id,
            self.wishlist.add(user_id, template.id, template.template_type),
        )
        .await;

        best_effort(
            &self.events,
            effects::LIKE_NOTIFICATION,
            template.id,
            self.notify_author(&template, user_id),
        )
        .await;

        tracing::info!(
            template_id = template.id,
            user_id,
            like_count = updated.like_count,
            "Template liked"
        );
        self.publish(event_types::TEMPLATE_LIKED, &updated, user_id);

        Ok(LikeToggle {
            liked: true,
            like_count: updated.like_count,
        })
    }

    /// Look up the liker and tell the author. An unknown liker sends nothing.
    async fn notify_author(&self, template: &Template, user_id: DbId) -> anyhow::Result<()> {
        let Some(liker) = self.users.find_user(user_id).await? else {
            tracing::debug!(
                template_id = template.id,
                user_id,
                "Liker not found, skipping notification"
            );
            return Ok(());
        };

        self.notifier
            .create_like_notification(LikeNotification {
                user_id: template.author_id,
                user_name: liker.name,
                product_id: template.id,
                product_name: template.title.clone(),
                product_type: template.template_type,
            })
            .await
    }

    fn publish(&self, event_type: &str, template: &Template, user_id: DbId) {
        self.events.publish(
            CatalogEvent::new(event_type)
                .with_template(template.id)
                .with_actor(user_id)
                .with_payload(json!({ "like_count": template.like_count })),
        );
    }
}
