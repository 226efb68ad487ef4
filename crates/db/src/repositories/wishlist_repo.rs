//! Repository for the `wishlist_items` table.

use designhub_core::catalog::TemplateType;
use designhub_core::types::DbId;
use sqlx::PgPool;

/// Idempotent wishlist membership.
pub struct WishlistRepo;

impl WishlistRepo {
    /// Add a template to a user's wishlist. Existing entries are left as is.
    pub async fn add(
        pool: &PgPool,
        user_id: DbId,
        template_id: DbId,
        kind: TemplateType,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO wishlist_items (user_id, template_id, kind) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, template_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(template_id)
        .bind(kind.as_str())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a template from a user's wishlist. Missing entries are ignored.
    pub async fn remove(pool: &PgPool, user_id: DbId, template_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND template_id = $2")
            .bind(user_id)
            .bind(template_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
