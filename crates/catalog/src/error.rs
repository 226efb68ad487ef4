use designhub_core::error::CoreError;
use designhub_db::repositories::template_repo::SLUG_UNIQUE_CONSTRAINT;

/// Error type for catalog service operations.
///
/// Domain failures (not found, forbidden, conflict, validation) arrive as
/// [`CoreError`]; anything the store could not do is a database error.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn not_found(id: designhub_core::types::DbId) -> Self {
        CoreError::NotFound {
            entity: "Template",
            id,
        }
        .into()
    }
}

/// Map an insert failure to a catalog error.
///
/// A PostgreSQL unique violation (`23505`) on the slug constraint becomes a
/// [`CoreError::Conflict`]; everything else stays a database error.
pub fn classify_insert_error(err: sqlx::Error, slug: &str) -> CatalogError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some(SLUG_UNIQUE_CONSTRAINT)
        {
            return duplicate_slug(slug).into();
        }
    }
    CatalogError::Database(err)
}

pub fn duplicate_slug(slug: &str) -> CoreError {
    CoreError::Conflict(format!("Slug '{slug}' is already in use"))
}
