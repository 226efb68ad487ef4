use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use designhub_core::catalog::TemplateStatus;
use designhub_core::moderation::publish_date_after;
use designhub_core::pagination::{PageRequest, SortDirection, SortField, SortSpec};
use designhub_core::types::DbId;
use designhub_db::models::template::{NewTemplate, Template, TemplateFilter, UpdateTemplate};
use tokio::sync::RwLock;

use super::TemplateStore;
use crate::error::{duplicate_slug, CatalogResult};

#[derive(Default)]
struct State {
    next_id: DbId,
    rows: BTreeMap<DbId, Template>,
}

/// [`TemplateStore`] that keeps rows in memory.
///
/// Mirrors the PostgreSQL store: same defaults on insert, same filter
/// semantics (via [`TemplateFilter::matches`]), same ordering with `id`
/// descending as tie-breaker and `NULL` publish dates last.
#[derive(Clone, Default)]
pub struct InMemoryTemplateStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    /// Apply `f` to a row that passes `guard`, stamping `updated_at`.
    async fn modify(
        &self,
        id: DbId,
        guard: impl FnOnce(&Template) -> bool + Send,
        f: impl FnOnce(&mut Template) + Send,
    ) -> Option<Template> {
        let mut state = self.state.write().await;
        let row = state.rows.get_mut(&id).filter(|row| guard(&**row))?;
        f(row);
        row.updated_at = Utc::now();
        Some(row.clone())
    }
}

fn any_row(_: &Template) -> bool {
    true
}

fn live_row(row: &Template) -> bool {
    !row.is_deleted
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn compare(a: &Template, b: &Template, sort: SortSpec) -> Ordering {
    let primary = match sort.field {
        SortField::CreatedAt => directed(a.created_at.cmp(&b.created_at), sort.direction),
        SortField::UpdatedAt => directed(a.updated_at.cmp(&b.updated_at), sort.direction),
        SortField::PublishDate => match (a.publish_date, b.publish_date) {
            (Some(x), Some(y)) => directed(x.cmp(&y), sort.direction),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortField::Title => directed(a.title.cmp(&b.title), sort.direction),
        SortField::Price => directed(a.price.total_cmp(&b.price), sort.direction),
        SortField::Rating => directed(a.rating.total_cmp(&b.rating), sort.direction),
        SortField::SalesCount => directed(a.sales_count.cmp(&b.sales_count), sort.direction),
        SortField::ViewCount => directed(a.view_count.cmp(&b.view_count), sort.direction),
        SortField::LikeCount => directed(a.like_count.cmp(&b.like_count), sort.direction),
    };
    primary.then_with(|| b.id.cmp(&a.id))
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn insert(&self, new: &NewTemplate) -> CatalogResult<Template> {
        let mut state = self.state.write().await;
        if state.rows.values().any(|row| row.slug == new.slug) {
            return Err(duplicate_slug(&new.slug).into());
        }

        state.next_id += 1;
        let id = state.next_id;
        let now = Utc::now();
        let input = new.input.clone();
        let template = Template {
            id,
            slug: new.slug.clone(),
            title: input.title,
            author_id: new.author_id,
            category_id: input.category_id,
            platform: input.platform,
            template_type: input.template_type,
            access_type: input.access_type.unwrap_or_default(),
            price: input.price,
            offer_price: input.offer_price,
            license_type: input.license_type.unwrap_or_default(),
            regular_license_price: input.regular_license_price.unwrap_or(input.price),
            extended_license_price: input.extended_license_price,
            rating: 0.0,
            review_count: 0,
            sales_count: 0,
            view_count: 0,
            like_count: 0,
            liked_by: Vec::new(),
            description: input.description,
            long_description: input.long_description,
            features: input.features,
            images: input.images,
            preview_url: input.preview_url,
            download_file: input.download_file,
            documentation_url: input.documentation_url,
            status: new.status,
            is_deleted: false,
            is_featured: false,
            publish_date: None,
            last_update: now,
            created_at: now,
            updated_at: now,
        };
        state.rows.insert(id, template.clone());
        Ok(template)
    }

    async fn find_by_id(&self, id: DbId) -> CatalogResult<Option<Template>> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn find_published_by_slug(&self, slug: &str) -> CatalogResult<Option<Template>> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .values()
            .find(|row| row.slug == slug && row.is_publicly_visible())
            .cloned())
    }

    async fn slug_exists(&self, slug: &str) -> CatalogResult<bool> {
        let state = self.state.read().await;
        Ok(state.rows.values().any(|row| row.slug == slug))
    }

    async fn list(
        &self,
        filter: &TemplateFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> CatalogResult<Vec<Template>> {
        let state = self.state.read().await;
        let mut rows: Vec<&Template> =
            state.rows.values().filter(|row| filter.matches(row)).collect();
        rows.sort_by(|a, b| compare(a, b, sort));

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(0);
        Ok(rows.into_iter().skip(offset).take(limit).cloned().collect())
    }

    async fn count(&self, filter: &TemplateFilter) -> CatalogResult<i64> {
        let state = self.state.read().await;
        let total = state.rows.values().filter(|row| filter.matches(row)).count();
        Ok(total as i64)
    }

    async fn update(&self, id: DbId, input: &UpdateTemplate) -> CatalogResult<Option<Template>> {
        let input = input.clone();
        Ok(self
            .modify(id, any_row, move |row| {
                macro_rules! apply {
                    ($($field:ident),+ $(,)?) => {
                        $(if let Some(value) = input.$field {
                            row.$field = value;
                        })+
                    };
                }
                macro_rules! apply_optional {
                    ($($field:ident),+ $(,)?) => {
                        $(if input.$field.is_some() {
                            row.$field = input.$field;
                        })+
                    };
                }
                apply!(
                    title,
                    category_id,
                    platform,
                    template_type,
                    access_type,
                    price,
                    license_type,
                    regular_license_price,
                    description,
                    features,
                    images,
                );
                apply_optional!(
                    offer_price,
                    extended_license_price,
                    long_description,
                    preview_url,
                    download_file,
                    documentation_url,
                );
                row.last_update = Utc::now();
            })
            .await)
    }

    async fn soft_delete(&self, id: DbId) -> CatalogResult<Option<Template>> {
        Ok(self
            .modify(id, live_row, |row| {
                row.is_deleted = true;
                row.last_update = Utc::now();
            })
            .await)
    }

    async fn set_status(
        &self,
        id: DbId,
        status: TemplateStatus,
    ) -> CatalogResult<Option<Template>> {
        Ok(self
            .modify(id, live_row, |row| {
                let now = Utc::now();
                row.publish_date = publish_date_after(row.publish_date, status, now);
                row.status = status;
                row.last_update = now;
            })
            .await)
    }

    async fn set_featured(&self, id: DbId, is_featured: bool) -> CatalogResult<Option<Template>> {
        Ok(self
            .modify(id, live_row, |row| {
                row.is_featured = is_featured;
                row.last_update = Utc::now();
            })
            .await)
    }

    async fn increment_view_count(&self, id: DbId) -> CatalogResult<bool> {
        Ok(self
            .modify(id, any_row, |row| row.view_count += 1)
            .await
            .is_some())
    }

    async fn increment_sales_count(&self, id: DbId) -> CatalogResult<bool> {
        Ok(self
            .modify(id, any_row, |row| row.sales_count += 1)
            .await
            .is_some())
    }

    async fn set_rating(&self, id: DbId, rating: f64, review_count: i64) -> CatalogResult<bool> {
        Ok(self
            .modify(id, any_row, |row| {
                row.rating = rating;
                row.review_count = review_count;
            })
            .await
            .is_some())
    }

    async fn add_like(&self, id: DbId, user_id: DbId) -> CatalogResult<Option<Template>> {
        Ok(self
            .modify(id, any_row, |row| {
                if !row.liked_by.contains(&user_id) {
                    row.liked_by.push(user_id);
                }
                row.like_count += 1;
            })
            .await)
    }

    async fn remove_like(&self, id: DbId, user_id: DbId) -> CatalogResult<Option<Template>> {
        Ok(self
            .modify(id, any_row, |row| {
                row.liked_by.retain(|liker| *liker != user_id);
                row.like_count = (row.like_count - 1).max(0);
            })
            .await)
    }
}
