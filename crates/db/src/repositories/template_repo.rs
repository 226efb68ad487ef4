//! Repository for the `templates` table.

use designhub_core::catalog::TemplateStatus;
use designhub_core::pagination::{PageRequest, SortSpec};
use designhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::template::{NewTemplate, Template, TemplateFilter, UpdateTemplate, Visibility};

/// Column list for `templates` queries.
const COLUMNS: &str = "\
    id, slug, title, author_id, category_id, platform, template_type, access_type, \
    price, offer_price, license_type, regular_license_price, extended_license_price, \
    rating, review_count, sales_count, view_count, like_count, liked_by, \
    description, long_description, features, images, preview_url, download_file, \
    documentation_url, status, is_deleted, is_featured, publish_date, last_update, \
    created_at, updated_at";

/// Name of the unique constraint on `slug`.
pub const SLUG_UNIQUE_CONSTRAINT: &str = "uq_templates_slug";

/// Provides CRUD, listing, moderation, and counter operations for templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Insert a new template, returning the created row.
    ///
    /// A slug collision surfaces as a unique violation on
    /// [`SLUG_UNIQUE_CONSTRAINT`].
    pub async fn create(pool: &PgPool, new: &NewTemplate) -> Result<Template, sqlx::Error> {
        let input = &new.input;
        let query = format!(
            "INSERT INTO templates \
                (slug, title, author_id, category_id, platform, template_type, access_type, \
                 price, offer_price, license_type, regular_license_price, extended_license_price, \
                 description, long_description, features, images, preview_url, download_file, \
                 documentation_url, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, $8), $12, \
                     $13, $14, $15, $16, $17, $18, $19, $20) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(&new.slug)
            .bind(&input.title)
            .bind(new.author_id)
            .bind(input.category_id)
            .bind(input.platform.as_str())
            .bind(input.template_type.as_str())
            .bind(input.access_type.unwrap_or_default().as_str())
            .bind(input.price)
            .bind(input.offer_price)
            .bind(input.license_type.unwrap_or_default().as_str())
            .bind(input.regular_license_price)
            .bind(input.extended_license_price)
            .bind(&input.description)
            .bind(&input.long_description)
            .bind(&input.features)
            .bind(&input.images)
            .bind(&input.preview_url)
            .bind(&input.download_file)
            .bind(&input.documentation_url)
            .bind(new.status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a template by ID, including soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an approved, non-deleted template by slug.
    pub async fn find_published_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM templates \
             WHERE slug = $1 AND status = 'approved' AND is_deleted = false"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether any template (deleted or not) already uses `slug`.
    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM templates WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    /// List one page of templates matching `filter`, ordered by `sort`.
    ///
    /// `id` breaks ties so paging is stable.
    pub async fn list(
        pool: &PgPool,
        filter: &TemplateFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> Result<Vec<Template>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_template_filter(filter);

        let query = format!(
            "SELECT {COLUMNS} FROM templates {where_clause} \
             ORDER BY {} {} NULLS LAST, id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            sort.field.column(),
            sort.direction.keyword(),
            bind_idx + 1
        );
        tracing::debug!(%query, "Listing templates");

        let q = bind_template_values(sqlx::query_as::<_, Template>(&query), &bind_values);
        q.bind(page.limit).bind(page.offset()).fetch_all(pool).await
    }

    /// Count templates matching `filter` (for pagination metadata).
    pub async fn count(pool: &PgPool, filter: &TemplateFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_template_filter(filter);

        let query = format!("SELECT COUNT(*)::BIGINT AS count FROM templates {where_clause}");

        let q = bind_template_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(pool).await
    }

    /// Update a template. Only non-`None` fields are applied; `last_update`
    /// is always stamped.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTemplate,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET \
                title = COALESCE($2, title), \
                category_id = COALESCE($3, category_id), \
                platform = COALESCE($4, platform), \
                template_type = COALESCE($5, template_type), \
                access_type = COALESCE($6, access_type), \
                price = COALESCE($7, price), \
                offer_price = COALESCE($8, offer_price), \
                license_type = COALESCE($9, license_type), \
                regular_license_price = COALESCE($10, regular_license_price), \
                extended_license_price = COALESCE($11, extended_license_price), \
                description = COALESCE($12, description), \
                long_description = COALESCE($13, long_description), \
                features = COALESCE($14, features), \
                images = COALESCE($15, images), \
                preview_url = COALESCE($16, preview_url), \
                download_file = COALESCE($17, download_file), \
                documentation_url = COALESCE($18, documentation_url), \
                last_update = NOW(), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.category_id)
            .bind(input.platform.map(|p| p.as_str()))
            .bind(input.template_type.map(|t| t.as_str()))
            .bind(input.access_type.map(|a| a.as_str()))
            .bind(input.price)
            .bind(input.offer_price)
            .bind(input.license_type.map(|l| l.as_str()))
            .bind(input.regular_license_price)
            .bind(input.extended_license_price)
            .bind(&input.description)
            .bind(&input.long_description)
            .bind(&input.features)
            .bind(&input.images)
            .bind(&input.preview_url)
            .bind(&input.download_file)
            .bind(&input.documentation_url)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a template. Returns the row as it was marked, or `None`
    /// if it does not exist or was already deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET is_deleted = true, last_update = NOW(), updated_at = NOW() \
             WHERE id = $1 AND is_deleted = false \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set the moderation status of a non-deleted template.
    ///
    /// Approval stamps `publish_date`; other statuses keep it.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: TemplateStatus,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET \
                status = $2, \
                publish_date = CASE WHEN $2 = 'approved' THEN NOW() ELSE publish_date END, \
                last_update = NOW(), \
                updated_at = NOW() \
             WHERE id = $1 AND is_deleted = false \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Set the editorial featured flag of a non-deleted template.
    pub async fn set_featured(
        pool: &PgPool,
        id: DbId,
        is_featured: bool,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET is_featured = $2, last_update = NOW(), updated_at = NOW() \
             WHERE id = $1 AND is_deleted = false \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(is_featured)
            .fetch_optional(pool)
            .await
    }

    /// Increment `view_count` by one. Returns `true` if a row was touched.
    pub async fn increment_view_count(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE templates SET view_count = view_count + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment `sales_count` by one. Returns `true` if a row was touched.
    pub async fn increment_sales_count(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE templates SET sales_count = sales_count + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Overwrite the aggregate rating and review count.
    pub async fn set_rating(
        pool: &PgPool,
        id: DbId,
        rating: f64,
        review_count: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE templates SET rating = $2, review_count = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(rating)
        .bind(review_count)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add `user_id` to `liked_by` (no duplicates) and increment `like_count`.
    ///
    /// The increment is unconditional: the caller decides membership before
    /// calling, so two racing likes by one user can push `like_count` above
    /// the size of `liked_by`.
    pub async fn add_like(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET \
                liked_by = CASE WHEN $2 = ANY(liked_by) THEN liked_by \
                                ELSE array_append(liked_by, $2) END, \
                like_count = like_count + 1, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Remove `user_id` from `liked_by` and decrement `like_count`, never
    /// below zero.
    pub async fn remove_like(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET \
                liked_by = array_remove(liked_by, $2), \
                like_count = GREATEST(like_count - 1, 0), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// Dynamic filter building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built listing queries.
enum BindValue {
    BigInt(i64),
    Float(f64),
    Text(String),
}

/// Escape `%`, `_` and `\` so user input matches literally inside ILIKE.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Build a WHERE clause and bind values from a [`TemplateFilter`].
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if no predicates are active, or starts with `WHERE `.
fn build_template_filter(filter: &TemplateFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    match filter.visibility {
        Visibility::Public => {
            conditions.push("status = 'approved'".to_string());
            conditions.push("is_deleted = false".to_string());
        }
        Visibility::Admin { include_deleted } => {
            if !include_deleted {
                conditions.push("is_deleted = false".to_string());
            }
            if let Some(status) = filter.status {
                conditions.push(format!("status = ${bind_idx}"));
                bind_idx += 1;
                bind_values.push(BindValue::Text(status.as_str().to_string()));
            }
        }
    }

    if let Some(term) = filter.search_term() {
        conditions.push(format!(
            "(title ILIKE ${bind_idx} OR description ILIKE ${bind_idx} \
              OR EXISTS (SELECT 1 FROM unnest(features) AS feature WHERE feature ILIKE ${bind_idx}))"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::Text(format!("%{}%", escape_like(term))));
    }

    if let Some(category_id) = filter.category_id {
        conditions.push(format!("category_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(category_id));
    }

    if let Some(platform) = filter.platform {
        conditions.push(format!("platform = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(platform.as_str().to_string()));
    }

    if let Some(template_type) = filter.template_type {
        conditions.push(format!("template_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(template_type.as_str().to_string()));
    }

    if let Some(access_type) = filter.access_type {
        conditions.push(format!("access_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(access_type.as_str().to_string()));
    }

    if filter.has_price_range() {
        let mut offer_bounds: Vec<String> = Vec::new();
        let mut price_bounds: Vec<String> = Vec::new();
        if let Some(min) = filter.min_price {
            offer_bounds.push(format!("offer_price >= ${bind_idx}"));
            price_bounds.push(format!("price >= ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::Float(min));
        }
        if let Some(max) = filter.max_price {
            offer_bounds.push(format!("offer_price <= ${bind_idx}"));
            price_bounds.push(format!("price <= ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::Float(max));
        }
        conditions.push(format!(
            "(({}) OR ({}))",
            offer_bounds.join(" AND "),
            price_bounds.join(" AND ")
        ));
    }

    if let Some(min_rating) = filter.min_rating {
        conditions.push(format!("rating >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Float(min_rating));
    }

    if let Some(is_featured) = filter.is_featured {
        conditions.push(if is_featured {
            "is_featured = true".to_string()
        } else {
            "is_featured = false".to_string()
        });
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_template_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Float(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_template_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Float(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}
