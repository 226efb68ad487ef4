//! Pagination and sorting for catalog listings.
//!
//! Pages are 1-based. Defaults are carried in [`PaginationDefaults`], which
//! the service layer builds from configuration and passes into each listing
//! call.

use serde::Serialize;

use crate::error::CoreError;

/// Default 1-based page number.
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size.
pub const DEFAULT_PAGE_LIMIT: i64 = 12;

/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Default number of featured templates returned.
pub const DEFAULT_FEATURED_LIMIT: i64 = 8;

/// Server-side pagination defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationDefaults {
    pub page: i64,
    pub limit: i64,
    pub max_limit: i64,
}

impl Default for PaginationDefaults {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
            max_limit: MAX_PAGE_LIMIT,
        }
    }
}

/// A resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Resolve caller-supplied values against the defaults.
    ///
    /// Missing or non-positive values fall back to the defaults; the limit is
    /// capped at `max_limit`.
    pub fn resolve(page: Option<i64>, limit: Option<i64>, defaults: &PaginationDefaults) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(defaults.page.max(1));
        let limit = limit
            .filter(|l| *l >= 1)
            .unwrap_or(defaults.limit)
            .clamp(1, defaults.max_limit.max(1));
        Self { page, limit }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Number of pages needed to show `total` rows at `limit` per page.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 || total <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// One page of results with its totals.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
            total_pages: total_pages(total, request.limit),
        }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Columns a listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    PublishDate,
    Title,
    Price,
    Rating,
    SalesCount,
    ViewCount,
    LikeCount,
}

impl SortField {
    /// Database column backing this field.
    pub fn column(self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::PublishDate => "publish_date",
            SortField::Title => "title",
            SortField::Price => "price",
            SortField::Rating => "rating",
            SortField::SalesCount => "sales_count",
            SortField::ViewCount => "view_count",
            SortField::LikeCount => "like_count",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let field = match name {
            "created_at" | "createdAt" => SortField::CreatedAt,
            "updated_at" | "updatedAt" => SortField::UpdatedAt,
            "publish_date" | "publishDate" => SortField::PublishDate,
            "title" => SortField::Title,
            "price" => SortField::Price,
            "rating" => SortField::Rating,
            "sales_count" | "salesCount" => SortField::SalesCount,
            "view_count" | "viewCount" => SortField::ViewCount,
            "like_count" | "likeCount" => SortField::LikeCount,
            _ => return None,
        };
        Some(field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Field plus direction. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Parse a caller-supplied sort expression.
    ///
    /// Accepts `field` (ascending), `-field` (descending), and
    /// `field:asc` / `field:desc`. Unknown fields are rejected so only
    /// allow-listed columns ever reach a query.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        let (name, direction) = if let Some(rest) = raw.strip_prefix('-') {
            (rest, SortDirection::Desc)
        } else if let Some((name, dir)) = raw.split_once(':') {
            let direction = match dir.to_ascii_lowercase().as_str() {
                "asc" => SortDirection::Asc,
                "desc" => SortDirection::Desc,
                other => {
                    return Err(CoreError::Validation(format!(
                        "Invalid sort direction '{other}'. Must be one of: asc, desc"
                    )))
                }
            };
            (name, direction)
        } else {
            (raw, SortDirection::Asc)
        };

        let field = SortField::from_name(name)
            .ok_or_else(|| CoreError::Validation(format!("Invalid sort field '{name}'")))?;
        Ok(Self { field, direction })
    }

    /// Parse an optional expression, falling back to the default order.
    pub fn parse_or_default(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(expr) => Self::parse(expr),
            None => Ok(Self::default()),
        }
    }
}
