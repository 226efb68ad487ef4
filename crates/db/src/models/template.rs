//! Template model, DTOs, and listing filters.

use designhub_core::catalog::{AccessType, LicenseType, Platform, TemplateStatus, TemplateType};
use designhub_core::moderation::is_publicly_visible;
use designhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `templates` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Template {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub author_id: DbId,
    pub category_id: DbId,
    #[sqlx(try_from = "String")]
    pub platform: Platform,
    #[sqlx(try_from = "String")]
    pub template_type: TemplateType,
    #[sqlx(try_from = "String")]
    pub access_type: AccessType,
    pub price: f64,
    pub offer_price: Option<f64>,
    #[sqlx(try_from = "String")]
    pub license_type: LicenseType,
    pub regular_license_price: f64,
    pub extended_license_price: Option<f64>,
    pub rating: f64,
    pub review_count: i64,
    pub sales_count: i64,
    pub view_count: i64,
    pub like_count: i64,
    pub liked_by: Vec<DbId>,
    pub description: String,
    pub long_description: Option<String>,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub preview_url: Option<String>,
    pub download_file: Option<String>,
    pub documentation_url: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: TemplateStatus,
    pub is_deleted: bool,
    pub is_featured: bool,
    pub publish_date: Option<Timestamp>,
    pub last_update: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Template {
    /// Whether the template is listed in the public catalog.
    pub fn is_publicly_visible(&self) -> bool {
        is_publicly_visible(self.status, self.is_deleted)
    }

    /// Whether `user_id` is in the liked-by set.
    pub fn is_liked_by(&self, user_id: DbId) -> bool {
        self.liked_by.contains(&user_id)
    }
}

/// DTO for creating a new template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplate {
    pub title: String,
    /// Explicit slug. Derived from the title when omitted.
    pub slug: Option<String>,
    pub category_id: DbId,
    pub platform: Platform,
    pub template_type: TemplateType,
    pub access_type: Option<AccessType>,
    pub price: f64,
    pub offer_price: Option<f64>,
    pub license_type: Option<LicenseType>,
    pub regular_license_price: Option<f64>,
    pub extended_license_price: Option<f64>,
    pub description: String,
    pub long_description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub preview_url: Option<String>,
    pub download_file: Option<String>,
    pub documentation_url: Option<String>,
    /// `draft` or `pending`; defaults to `pending`.
    pub status: Option<TemplateStatus>,
}

/// A fully resolved insert: the author's payload plus the fields the catalog
/// assigns (author, slug, initial status).
///
/// `publish_date` is left unset; it is stamped by the first approval.
#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub author_id: DbId,
    pub slug: String,
    pub status: TemplateStatus,
    pub input: CreateTemplate,
}

/// DTO for updating an existing template. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTemplate {
    pub title: Option<String>,
    pub category_id: Option<DbId>,
    pub platform: Option<Platform>,
    pub template_type: Option<TemplateType>,
    pub access_type: Option<AccessType>,
    pub price: Option<f64>,
    pub offer_price: Option<f64>,
    pub license_type: Option<LicenseType>,
    pub regular_license_price: Option<f64>,
    pub extended_license_price: Option<f64>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub features: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub preview_url: Option<String>,
    pub download_file: Option<String>,
    pub documentation_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Listing filters
// ---------------------------------------------------------------------------

/// Which records a listing may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Approved and not deleted.
    #[default]
    Public,
    /// Any status; soft-deleted rows only when `include_deleted` is set.
    Admin { include_deleted: bool },
}

/// Conjunction of optional listing predicates.
///
/// Every `Some` field narrows the result. The price bounds are matched
/// against `offer_price` OR `price`, so a template is included when either
/// amount falls inside the range.
#[derive(Debug, Clone, Default)]
pub struct TemplateFilter {
    pub visibility: Visibility,
    /// Case-insensitive substring over title, description, and features.
    pub search: Option<String>,
    pub category_id: Option<DbId>,
    pub platform: Option<Platform>,
    pub template_type: Option<TemplateType>,
    pub access_type: Option<AccessType>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    /// Only honoured for admin visibility.
    pub status: Option<TemplateStatus>,
    pub is_featured: Option<bool>,
}

impl TemplateFilter {
    /// Normalized search term, if any non-blank term was given.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Whether a price bound is active.
    pub fn has_price_range(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }

    /// Evaluate the filter against a single template.
    ///
    /// This is the in-process mirror of the SQL built by
    /// `TemplateRepo::list`.
    pub fn matches(&self, template: &Template) -> bool {
        let visible = match self.visibility {
            Visibility::Public => template.is_publicly_visible(),
            Visibility::Admin { include_deleted } => {
                (include_deleted || !template.is_deleted)
                    && self.status.map_or(true, |s| template.status == s)
            }
        };
        if !visible {
            return false;
        }

        if let Some(term) = self.search_term() {
            let needle = term.to_lowercase();
            let hit = template.title.to_lowercase().contains(&needle)
                || template.description.to_lowercase().contains(&needle)
                || template
                    .features
                    .iter()
                    .any(|f| f.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if self.category_id.is_some_and(|id| template.category_id != id)
            || self.platform.is_some_and(|p| template.platform != p)
            || self.template_type.is_some_and(|t| template.template_type != t)
            || self.access_type.is_some_and(|a| template.access_type != a)
            || self.is_featured.is_some_and(|f| template.is_featured != f)
            || self.min_rating.is_some_and(|r| template.rating < r)
        {
            return false;
        }

        if self.has_price_range() {
            let in_range = |amount: f64| {
                self.min_price.map_or(true, |min| amount >= min)
                    && self.max_price.map_or(true, |max| amount <= max)
            };
            if !(template.offer_price.is_some_and(|p| in_range(p)) || in_range(template.price)) {
                return false;
            }
        }

        true
    }
}
