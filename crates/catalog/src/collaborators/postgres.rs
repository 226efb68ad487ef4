//! Collaborator implementations over the marketplace tables.

use std::collections::HashMap;

use async_trait::async_trait;
use designhub_core::catalog::TemplateType;
use designhub_core::types::DbId;
use designhub_db::models::notification::NewLikeNotification;
use designhub_db::repositories::{CategoryRepo, NotificationRepo, UserRepo, WishlistRepo};
use designhub_db::DbPool;

use super::{
    CategoryDirectory, CategorySummary, LikeNotification, Notifier, UserDirectory, UserSummary,
    Wishlist,
};

/// Category, user, wishlist and notifier collaborators sharing one pool.
#[derive(Clone)]
pub struct PgCollaborators {
    pool: DbPool,
}

impl PgCollaborators {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryDirectory for PgCollaborators {
    async fn increment_product_count(&self, category_id: DbId) -> anyhow::Result<()> {
        if !CategoryRepo::increment_product_count(&self.pool, category_id).await? {
            anyhow::bail!("category {category_id} not found");
        }
        Ok(())
    }

    async fn decrement_product_count(&self, category_id: DbId) -> anyhow::Result<()> {
        if !CategoryRepo::decrement_product_count(&self.pool, category_id).await? {
            anyhow::bail!("category {category_id} not found");
        }
        Ok(())
    }

    async fn find_summaries(&self, ids: &[DbId]) -> anyhow::Result<HashMap<DbId, CategorySummary>> {
        let rows = CategoryRepo::find_by_ids(&self.pool, ids).await?;
        Ok(rows
            .into_iter()
            .map(|c| {
                let summary = CategorySummary {
                    id: c.id,
                    name: c.name,
                    slug: c.slug,
                };
                (c.id, summary)
            })
            .collect())
    }
}

#[async_trait]
impl UserDirectory for PgCollaborators {
    async fn find_user(&self, user_id: DbId) -> anyhow::Result<Option<UserSummary>> {
        let user = UserRepo::find_by_id(&self.pool, user_id).await?;
        Ok(user.map(|u| UserSummary {
            id: u.id,
            name: u.name,
        }))
    }
}

#[async_trait]
impl Wishlist for PgCollaborators {
    async fn add(&self, user_id: DbId, template_id: DbId, kind: TemplateType) -> anyhow::Result<()> {
        WishlistRepo::add(&self.pool, user_id, template_id, kind).await?;
        Ok(())
    }

    async fn remove(&self, user_id: DbId, template_id: DbId) -> anyhow::Result<()> {
        WishlistRepo::remove(&self.pool, user_id, template_id).await?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for PgCollaborators {
    async fn create_like_notification(&self, notification: LikeNotification) -> anyhow::Result<()> {
        let id = NotificationRepo::create_like(
            &self.pool,
            &NewLikeNotification {
                user_id: notification.user_id,
                actor_name: notification.user_name,
                product_id: notification.product_id,
                product_name: notification.product_name,
                product_type: notification.product_type,
            },
        )
        .await?;
        tracing::debug!(notification_id = id, "Like notification stored");
        Ok(())
    }
}
