//! Contracts for the subsystems the catalog calls into.
//!
//! The catalog owns none of these; it only makes the narrow calls below.
//! Implementations are injected at construction as `Arc<dyn Trait>` and
//! report failures as opaque [`anyhow::Error`]s, which the services treat
//! as best-effort.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use designhub_core::catalog::TemplateType;
use designhub_core::delivery::ResourceKind;
use designhub_core::types::DbId;
use serde::Serialize;

mod postgres;

pub use postgres::PgCollaborators;

/// Display fields of a category, embedded in template responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: DbId,
    pub name: String,
}

/// Payload of the notification sent to an author when their template is
/// liked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LikeNotification {
    /// Recipient (the template author).
    pub user_id: DbId,
    /// Display name of the user who liked the template.
    pub user_name: String,
    pub product_id: DbId,
    pub product_name: String,
    pub product_type: TemplateType,
}

/// Parameters bound into a signed download URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOptions {
    pub resource_kind: ResourceKind,
    pub delivery_mode: String,
    pub version: Option<String>,
    /// Serve with an attachment content disposition.
    pub attachment: bool,
    pub attachment_name: String,
    pub expires_at_epoch_secs: i64,
}

#[async_trait]
pub trait CategoryDirectory: Send + Sync {
    async fn increment_product_count(&self, category_id: DbId) -> anyhow::Result<()>;

    async fn decrement_product_count(&self, category_id: DbId) -> anyhow::Result<()>;

    /// Resolve display fields for the given categories. Unknown ids are
    /// absent from the map.
    async fn find_summaries(&self, ids: &[DbId]) -> anyhow::Result<HashMap<DbId, CategorySummary>>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, user_id: DbId) -> anyhow::Result<Option<UserSummary>>;
}

/// Idempotent per-user wishlist membership.
#[async_trait]
pub trait Wishlist: Send + Sync {
    async fn add(&self, user_id: DbId, template_id: DbId, kind: TemplateType) -> anyhow::Result<()>;

    async fn remove(&self, user_id: DbId, template_id: DbId) -> anyhow::Result<()>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn create_like_notification(&self, notification: LikeNotification) -> anyhow::Result<()>;
}

/// Issues time-limited URLs for stored files.
#[async_trait]
pub trait LinkSigningProvider: Send + Sync {
    async fn sign(&self, public_id: &str, options: &SignOptions) -> anyhow::Result<String>;
}

/// The full set of collaborators the catalog services are wired with.
#[derive(Clone)]
pub struct Collaborators {
    pub categories: Arc<dyn CategoryDirectory>,
    pub users: Arc<dyn UserDirectory>,
    pub wishlist: Arc<dyn Wishlist>,
    pub notifier: Arc<dyn Notifier>,
    pub signer: Arc<dyn LinkSigningProvider>,
}

impl Collaborators {
    /// Category, user, wishlist and notification calls against the shared
    /// PostgreSQL schema, with `signer` for download links.
    pub fn postgres(pool: designhub_db::DbPool, signer: Arc<dyn LinkSigningProvider>) -> Self {
        let shared = Arc::new(PgCollaborators::new(pool));
        Self {
            categories: shared.clone(),
            users: shared.clone(),
            wishlist: shared.clone(),
            notifier: shared,
            signer,
        }
    }
}
