//! Persistence seam for templates.
//!
//! [`TemplateStore`] is the only way the services touch stored templates.
//! [`PgTemplateStore`] runs against PostgreSQL through `TemplateRepo`;
//! [`InMemoryTemplateStore`] keeps rows in process for tests and local runs.

mod memory;
mod postgres;

pub use memory::InMemoryTemplateStore;
pub use postgres::PgTemplateStore;

use async_trait::async_trait;
use designhub_core::catalog::TemplateStatus;
use designhub_core::pagination::{PageRequest, SortSpec};
use designhub_core::types::DbId;
use designhub_db::models::template::{NewTemplate, Template, TemplateFilter, UpdateTemplate};

use crate::error::CatalogResult;

/// Row-level template operations.
///
/// Mutations return `None` (or `false`) when no row matched. Soft-deleted
/// rows are never matched by `soft_delete`, `set_status` or `set_featured`.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Insert a template. A taken slug is a `Conflict`.
    async fn insert(&self, new: &NewTemplate) -> CatalogResult<Template>;

    /// Point lookup that includes soft-deleted rows.
    async fn find_by_id(&self, id: DbId) -> CatalogResult<Option<Template>>;

    /// Approved, non-deleted template by slug.
    async fn find_published_by_slug(&self, slug: &str) -> CatalogResult<Option<Template>>;

    async fn slug_exists(&self, slug: &str) -> CatalogResult<bool>;

    async fn list(
        &self,
        filter: &TemplateFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> CatalogResult<Vec<Template>>;

    async fn count(&self, filter: &TemplateFilter) -> CatalogResult<i64>;

    async fn update(&self, id: DbId, input: &UpdateTemplate) -> CatalogResult<Option<Template>>;

    async fn soft_delete(&self, id: DbId) -> CatalogResult<Option<Template>>;

    async fn set_status(&self, id: DbId, status: TemplateStatus)
        -> CatalogResult<Option<Template>>;

    async fn set_featured(&self, id: DbId, is_featured: bool) -> CatalogResult<Option<Template>>;

    async fn increment_view_count(&self, id: DbId) -> CatalogResult<bool>;

    async fn increment_sales_count(&self, id: DbId) -> CatalogResult<bool>;

    async fn set_rating(&self, id: DbId, rating: f64, review_count: i64) -> CatalogResult<bool>;

    /// Add `user_id` to `liked_by` without duplicates; always increments
    /// `like_count`.
    async fn add_like(&self, id: DbId, user_id: DbId) -> CatalogResult<Option<Template>>;

    /// Remove `user_id` from `liked_by`; decrements `like_count` with a floor
    /// of zero.
    async fn remove_like(&self, id: DbId, user_id: DbId) -> CatalogResult<Option<Template>>;
}
