use async_trait::async_trait;
use designhub_core::catalog::TemplateStatus;
use designhub_core::pagination::{PageRequest, SortSpec};
use designhub_core::types::DbId;
use designhub_db::models::template::{NewTemplate, Template, TemplateFilter, UpdateTemplate};
use designhub_db::repositories::TemplateRepo;
use designhub_db::DbPool;

use super::TemplateStore;
use crate::error::{classify_insert_error, CatalogResult};

/// [`TemplateStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgTemplateStore {
    pool: DbPool,
}

impl PgTemplateStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateStore for PgTemplateStore {
    async fn insert(&self, new: &NewTemplate) -> CatalogResult<Template> {
        TemplateRepo::create(&self.pool, new)
            .await
            .map_err(|e| classify_insert_error(e, &new.slug))
    }

    async fn find_by_id(&self, id: DbId) -> CatalogResult<Option<Template>> {
        Ok(TemplateRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_published_by_slug(&self, slug: &str) -> CatalogResult<Option<Template>> {
        Ok(TemplateRepo::find_published_by_slug(&self.pool, slug).await?)
    }

    async fn slug_exists(&self, slug: &str) -> CatalogResult<bool> {
        Ok(TemplateRepo::slug_exists(&self.pool, slug).await?)
    }

    async fn list(
        &self,
        filter: &TemplateFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> CatalogResult<Vec<Template>> {
        Ok(TemplateRepo::list(&self.pool, filter, sort, page).await?)
    }

    async fn count(&self, filter: &TemplateFilter) -> CatalogResult<i64> {
        Ok(TemplateRepo::count(&self.pool, filter).await?)
    }

    async fn update(&self, id: DbId, input: &UpdateTemplate) -> CatalogResult<Option<Template>> {
        Ok(TemplateRepo::update(&self.pool, id, input).await?)
    }

    async fn soft_delete(&self, id: DbId) -> CatalogResult<Option<Template>> {
        Ok(TemplateRepo::soft_delete(&self.pool, id).await?)
    }

    async fn set_status(
        &self,
        id: DbId,
        status: TemplateStatus,
    ) -> CatalogResult<Option<Template>> {
        Ok(TemplateRepo::set_status(&self.pool, id, status).await?)
    }

    async fn set_featured(&self, id: DbId, is_featured: bool) -> CatalogResult<Option<Template>> {
        Ok(TemplateRepo::set_featured(&self.pool, id, is_featured).await?)
    }

    async fn increment_view_count(&self, id: DbId) -> CatalogResult<bool> {
        Ok(TemplateRepo::increment_view_count(&self.pool, id).await?)
    }

    async fn increment_sales_count(&self, id: DbId) -> CatalogResult<bool> {
        Ok(TemplateRepo::increment_sales_count(&self.pool, id).await?)
    }

    async fn set_rating(&self, id: DbId, rating: f64, review_count: i64) -> CatalogResult<bool> {
        Ok(TemplateRepo::set_rating(&self.pool, id, rating, review_count).await?)
    }

    async fn add_like(&self, id: DbId, user_id: DbId) -> CatalogResult<Option<Template>> {
        Ok(TemplateRepo::add_like(&self.pool, id, user_id).await?)
    }

    async fn remove_like(&self, id: DbId, user_id: DbId) -> CatalogResult<Option<Template>> {
        Ok(TemplateRepo::remove_like(&self.pool, id, user_id).await?)
    }
}
