//! Repository for the `notifications` table.

use designhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{NewLikeNotification, KIND_LIKE};

pub struct NotificationRepo;

impl NotificationRepo {
    /// Record a like notification, returning the generated ID.
    pub async fn create_like(
        pool: &PgPool,
        input: &NewLikeNotification,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notifications \
                (user_id, kind, actor_name, product_id, product_name, product_type) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(input.user_id)
        .bind(KIND_LIKE)
        .bind(&input.actor_name)
        .bind(input.product_id)
        .bind(&input.product_name)
        .bind(input.product_type.as_str())
        .fetch_one(pool)
        .await
    }
}
