//! Caller-facing listing parameters.
//!
//! These are what a transport layer deserializes from a request; the
//! services turn them into a [`TemplateFilter`] plus a resolved page and
//! sort.

use designhub_core::catalog::{AccessType, Platform, TemplateStatus, TemplateType};
use designhub_core::types::DbId;
use designhub_db::models::template::{TemplateFilter, Visibility};
use serde::Deserialize;

/// Filters shared by public and admin listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilters {
    pub search: Option<String>,
    pub category_id: Option<DbId>,
    pub platform: Option<Platform>,
    pub template_type: Option<TemplateType>,
    pub access_type: Option<AccessType>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
}

impl ListFilters {
    pub fn into_filter(self, visibility: Visibility) -> TemplateFilter {
        TemplateFilter {
            visibility,
            search: self.search,
            category_id: self.category_id,
            platform: self.platform,
            template_type: self.template_type,
            access_type: self.access_type,
            min_price: self.min_price,
            max_price: self.max_price,
            min_rating: self.min_rating,
            status: None,
            is_featured: None,
        }
    }
}

/// Admin listing filters: any status, optionally including soft-deleted rows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminListFilters {
    #[serde(flatten)]
    pub common: ListFilters,
    pub status: Option<TemplateStatus>,
    #[serde(default)]
    pub include_deleted: bool,
}

impl AdminListFilters {
    pub fn into_filter(self) -> TemplateFilter {
        let status = self.status;
        let visibility = Visibility::Admin {
            include_deleted: self.include_deleted,
        };
        TemplateFilter {
            status,
            ..self.common.into_filter(visibility)
        }
    }
}

/// Page, page size and sort expression (`-sales_count`, `price:asc`, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
}
