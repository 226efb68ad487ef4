//! The catalog store service: template lifecycle, lookups and listings.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use designhub_core::catalog::TemplateStatus;
use designhub_core::error::CoreError;
use designhub_core::moderation::initial_status;
use designhub_core::pagination::{Page, PageRequest, SortDirection, SortField, SortSpec};
use designhub_core::slug::{derive_unique_slug, validate_slug};
use designhub_core::types::DbId;
use designhub_core::validation::{
    validate_amount, validate_description, validate_optional_amount, validate_rating,
    validate_title,
};
use designhub_db::models::template::{
    CreateTemplate, NewTemplate, Template, TemplateFilter, UpdateTemplate, Visibility,
};
use designhub_events::{event_types, CatalogEvent, EventBus};
use serde::Serialize;
use serde_json::json;

use crate::category_accounting::CategoryAccounting;
use crate::collaborators::{CategoryDirectory, CategorySummary, Collaborators};
use crate::config::CatalogConfig;
use crate::download::{DownloadLink, LinkSigner};
use crate::error::{duplicate_slug, CatalogError, CatalogResult};
use crate::moderation::ModerationWorkflow;
use crate::query::{AdminListFilters, ListFilters, ListQuery};
use crate::side_effects::{best_effort, effects};
use crate::store::TemplateStore;

/// A template with its category resolved to display fields.
///
/// `category` is `None` when the category subsystem could not resolve it.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateView {
    #[serde(flatten)]
    pub template: Template,
    pub category: Option<CategorySummary>,
}

pub struct CatalogService {
    store: Arc<dyn TemplateStore>,
    categories: Arc<dyn CategoryDirectory>,
    accounting: CategoryAccounting,
    moderation: ModerationWorkflow,
    links: LinkSigner,
    events: Arc<EventBus>,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(
        store: Arc<dyn TemplateStore>,
        collaborators: &Collaborators,
        events: Arc<EventBus>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            accounting: CategoryAccounting::new(
                Arc::clone(&collaborators.categories),
                Arc::clone(&events),
            ),
            moderation: ModerationWorkflow::new(Arc::clone(&store), Arc::clone(&events)),
            links: LinkSigner::new(
                Arc::clone(&collaborators.signer),
                config.link_ttl_secs,
                Arc::clone(&events),
            ),
            categories: Arc::clone(&collaborators.categories),
            store,
            events,
            config,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Create a template for `author_id`.
    ///
    /// Without an explicit slug one is derived from the title plus a
    /// creation-time token. An explicit slug that is already taken is a
    /// `Conflict`. The category count is incremented after the insert.
    pub async fn create(
        &self,
        author_id: DbId,
        input: CreateTemplate,
    ) -> CatalogResult<TemplateView> {
        validate_create(&input)?;
        let status = initial_status(input.status)?;

        let slug = match input.slug.as_deref() {
            Some(explicit) => {
                validate_slug(explicit)?;
                if self.store.slug_exists(explicit).await? {
                    return Err(duplicate_slug(explicit).into());
                }
                explicit.to_string()
            }
            None => derive_unique_slug(&input.title, Utc::now()),
        };

        let template = self
            .store
            .insert(&NewTemplate {
                author_id,
                slug,
                status,
                input,
            })
            .await?;

        tracing::info!(
            template_id = template.id,
            author_id,
            category_id = template.category_id,
            slug = %template.slug,
            "Template created"
        );

        self.accounting
            .record_created(template.id, template.category_id)
            .await;
        self.events.publish(
            CatalogEvent::new(event_types::TEMPLATE_CREATED)
                .with_template(template.id)
                .with_actor(author_id)
                .with_payload(json!({ "slug": template.slug, "status": template.status })),
        );

        Ok(self.view(template).await)
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Any template by id, soft-deleted ones included.
    pub async fn get_by_id(&self, id: DbId) -> CatalogResult<TemplateView> {
        let template = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(id))?;
        Ok(self.view(template).await)
    }

    /// A publicly visible template by slug. Counts a view, best-effort.
    pub async fn get_by_slug(&self, slug: &str) -> CatalogResult<TemplateView> {
        let template = self
            .store
            .find_published_by_slug(slug)
            .await?
            .ok_or_else(|| CoreError::SlugNotFound {
                entity: "Template",
                slug: slug.to_string(),
            })?;

        self.record_view(template.id).await;
        Ok(self.view(template).await)
    }

    // -----------------------------------------------------------------------
    // Listings
    // -----------------------------------------------------------------------

    /// Approved, non-deleted templates matching `filters`.
    pub async fn list_public(
        &self,
        filters: ListFilters,
        query: ListQuery,
    ) -> CatalogResult<Page<TemplateView>> {
        self.list_page(filters.into_filter(Visibility::Public), query)
            .await
    }

    /// Featured templates, best sellers first. `limit` defaults to the
    /// configured featured size and is capped at the page-size maximum.
    pub async fn list_featured(&self, limit: Option<i64>) -> CatalogResult<Vec<TemplateView>> {
        let limit = limit
            .filter(|l| *l >= 1)
            .unwrap_or(self.config.featured_limit)
            .min(self.config.pagination.max_limit);
        let filter = TemplateFilter {
            is_featured: Some(true),
            ..Default::default()
        };
        let sort = SortSpec::new(SortField::SalesCount, SortDirection::Desc);

        let rows = self
            .store
            .list(&filter, sort, PageRequest { page: 1, limit })
            .await?;
        Ok(self.views(rows).await)
    }

    /// Templates of any status for administrators.
    pub async fn list_admin(
        &self,
        filters: AdminListFilters,
        query: ListQuery,
    ) -> CatalogResult<Page<TemplateView>> {
        self.list_page(filters.into_filter(), query).await
    }

    async fn list_page(
        &self,
        filter: TemplateFilter,
        query: ListQuery,
    ) -> CatalogResult<Page<TemplateView>> {
        let request = PageRequest::resolve(query.page, query.limit, &self.config.pagination);
        let sort = SortSpec::parse_or_default(query.sort.as_deref())?;

        let (rows, total) = tokio::try_join!(
            self.store.list(&filter, sort, request),
            self.store.count(&filter),
        )?;

        let items = self.views(rows).await;
        Ok(Page::new(items, total, request))
    }

    // -----------------------------------------------------------------------
    // Update / delete
    // -----------------------------------------------------------------------

    /// Partially update a template. Only its author or an administrator may
    /// do this. A category change moves the category product count.
    pub async fn update(
        &self,
        id: DbId,
        input: UpdateTemplate,
        actor_id: DbId,
        is_admin: bool,
    ) -> CatalogResult<TemplateView> {
        let current = self.find_live(id).await?;
        authorize(&current, actor_id, is_admin)?;
        validate_update(&input)?;

        let updated = self
            .store
            .update(id, &input)
            .await?
            .ok_or_else(|| CatalogError::not_found(id))?;

        tracing::info!(template_id = id, actor_id, "Template updated");

        self.accounting
            .record_moved(id, current.category_id, updated.category_id)
            .await;
        self.events.publish(
            CatalogEvent::new(event_types::TEMPLATE_UPDATED)
                .with_template(id)
                .with_actor(actor_id),
        );

        Ok(self.view(updated).await)
    }

    /// Soft-delete a template (author or administrator). Deleting an
    /// already-deleted template is `NotFound`.
    pub async fn soft_delete(&self, id: DbId, actor_id: DbId, is_admin: bool) -> CatalogResult<()> {
        let current = self.find_live(id).await?;
        authorize(&current, actor_id, is_admin)?;

        let deleted = self
            .store
            .soft_delete(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(id))?;

        tracing::info!(template_id = id, actor_id, "Template soft-deleted");

        self.accounting
            .record_removed(id, deleted.category_id)
            .await;
        self.events.publish(
            CatalogEvent::new(event_types::TEMPLATE_DELETED)
                .with_template(id)
                .with_actor(actor_id),
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Moderation and editorial flags
    // -----------------------------------------------------------------------

    /// Moderate a template. See [`ModerationWorkflow::set_status`].
    pub async fn set_status(
        &self,
        id: DbId,
        status: TemplateStatus,
    ) -> CatalogResult<TemplateView> {
        let template = self.moderation.set_status(id, status).await?;
        Ok(self.view(template).await)
    }

    pub async fn set_featured(&self, id: DbId, is_featured: bool) -> CatalogResult<TemplateView> {
        let template = self
            .store
            .set_featured(id, is_featured)
            .await?
            .ok_or_else(|| CatalogError::not_found(id))?;
        tracing::info!(template_id = id, is_featured, "Template featured flag set");
        Ok(self.view(template).await)
    }

    // -----------------------------------------------------------------------
    // Counters
    // -----------------------------------------------------------------------

    pub async fn increment_view_count(&self, id: DbId) -> CatalogResult<()> {
        touched(self.store.increment_view_count(id).await?, id)
    }

    pub async fn increment_sales_count(&self, id: DbId) -> CatalogResult<()> {
        touched(self.store.increment_sales_count(id).await?, id)
    }

    /// Overwrite the aggregate rating. `rating` must be within 0..=5 and
    /// `review_count` non-negative.
    pub async fn set_rating(&self, id: DbId, rating: f64, review_count: i64) -> CatalogResult<()> {
        validate_rating(rating, review_count)?;
        touched(self.store.set_rating(id, rating, review_count).await?, id)
    }

    // -----------------------------------------------------------------------
    // Downloads
    // -----------------------------------------------------------------------

    /// Issue a download link for a template's stored file, counting a view.
    pub async fn issue_download_link(&self, id: DbId) -> CatalogResult<DownloadLink> {
        let template = self.find_live(id).await?;
        let Some(download_file) = template.download_file.as_deref() else {
            return Err(
                CoreError::Validation(format!("Template {id} has no downloadable file")).into(),
            );
        };

        self.record_view(id).await;
        Ok(self.links.issue(id, download_file, &template.title).await)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn find_live(&self, id: DbId) -> CatalogResult<Template> {
        self.store
            .find_by_id(id)
            .await?
            .filter(|t| !t.is_deleted)
            .ok_or_else(|| CatalogError::not_found(id))
    }

    async fn record_view(&self, id: DbId) {
        best_effort(&self.events, effects::VIEW_COUNT, id, async {
            self.store.increment_view_count(id).await?;
            Ok::<(), anyhow::Error>(())
        })
        .await;
    }

    async fn view(&self, template: Template) -> TemplateView {
        let mut summaries = self.category_summaries(&[template.category_id]).await;
        TemplateView {
            category: summaries.remove(&template.category_id),
            template,
        }
    }

    async fn views(&self, templates: Vec<Template>) -> Vec<TemplateView> {
        let mut ids: Vec<DbId> = templates.iter().map(|t| t.category_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let summaries = self.category_summaries(&ids).await;

        templates
            .into_iter()
            .map(|template| TemplateView {
                category: summaries.get(&template.category_id).cloned(),
                template,
            })
            .collect()
    }

    async fn category_summaries(&self, ids: &[DbId]) -> HashMap<DbId, CategorySummary> {
        if ids.is_empty() {
            return HashMap::new();
        }
        match self.categories.find_summaries(ids).await {
            Ok(summaries) => summaries,
            Err(err) => {
                tracing::warn!(error = %err, "Category lookup failed, omitting category");
                HashMap::new()
            }
        }
    }
}

fn authorize(template: &Template, actor_id: DbId, is_admin: bool) -> Result<(), CoreError> {
    if is_admin || template.author_id == actor_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the author or an administrator can modify this template".to_string(),
        ))
    }
}

fn touched(found: bool, id: DbId) -> CatalogResult<()> {
    if found {
        Ok(())
    } else {
        Err(CatalogError::not_found(id))
    }
}

fn validate_create(input: &CreateTemplate) -> Result<(), CoreError> {
    validate_title(&input.title)?;
    validate_description(&input.description)?;
    validate_amount("price", input.price)?;
    validate_optional_amount("offer_price", input.offer_price)?;
    validate_optional_amount("regular_license_price", input.regular_license_price)?;
    validate_optional_amount("extended_license_price", input.extended_license_price)?;
    Ok(())
}

fn validate_update(input: &UpdateTemplate) -> Result<(), CoreError> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    if let Some(description) = &input.description {
        validate_description(description)?;
    }
    validate_optional_amount("price", input.price)?;
    validate_optional_amount("offer_price", input.offer_price)?;
    validate_optional_amount("regular_license_price", input.regular_license_price)?;
    validate_optional_amount("extended_license_price", input.extended_license_price)?;
    Ok(())
}
