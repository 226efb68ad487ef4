use std::str::FromStr;

use designhub_core::pagination::{
    PaginationDefaults, DEFAULT_FEATURED_LIMIT, DEFAULT_PAGE, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};

/// Default lifetime of a signed download link.
pub const DEFAULT_LINK_TTL_SECS: i64 = 3600;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a valid {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{0}")]
    Inconsistent(String),
}

/// Credentials for the HMAC download-link signer. Any field left unset
/// disables signing and downloads fall back to the stored URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

/// Catalog configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Page and page-size defaults for listings.
    pub pagination: PaginationDefaults,
    /// Size of the featured shelf when the caller gives no limit.
    pub featured_limit: i64,
    pub link_ttl_secs: i64,
    pub signing: SigningConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            pagination: PaginationDefaults::default(),
            featured_limit: DEFAULT_FEATURED_LIMIT,
            link_ttl_secs: DEFAULT_LINK_TTL_SECS,
            signing: SigningConfig::default(),
        }
    }
}

impl CatalogConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default |
    /// |--------------------------|---------|
    /// | `CATALOG_DEFAULT_PAGE`   | `1`     |
    /// | `CATALOG_DEFAULT_LIMIT`  | `12`    |
    /// | `CATALOG_MAX_LIMIT`      | `100`   |
    /// | `CATALOG_FEATURED_LIMIT` | `8`     |
    /// | `DOWNLOAD_LINK_TTL_SECS` | `3600`  |
    /// | `SIGNING_BASE_URL`       | unset   |
    /// | `SIGNING_API_KEY`        | unset   |
    /// | `SIGNING_API_SECRET`     | unset   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let page = parse_var(&lookup, "CATALOG_DEFAULT_PAGE", DEFAULT_PAGE)?;
        let limit = parse_var(&lookup, "CATALOG_DEFAULT_LIMIT", DEFAULT_PAGE_LIMIT)?;
        let max_limit = parse_var(&lookup, "CATALOG_MAX_LIMIT", MAX_PAGE_LIMIT)?;
        let featured_limit = parse_var(&lookup, "CATALOG_FEATURED_LIMIT", DEFAULT_FEATURED_LIMIT)?;
        let link_ttl_secs = parse_var(&lookup, "DOWNLOAD_LINK_TTL_SECS", DEFAULT_LINK_TTL_SECS)?;

        if page < 1 || limit < 1 || featured_limit < 1 || link_ttl_secs < 1 {
            return Err(ConfigError::Inconsistent(
                "Pagination, featured and link TTL settings must be positive".to_string(),
            ));
        }
        if limit > max_limit {
            return Err(ConfigError::Inconsistent(format!(
                "CATALOG_DEFAULT_LIMIT ({limit}) exceeds CATALOG_MAX_LIMIT ({max_limit})"
            )));
        }

        let non_empty = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let signing = SigningConfig {
            base_url: non_empty("SIGNING_BASE_URL"),
            api_key: non_empty("SIGNING_API_KEY"),
            api_secret: non_empty("SIGNING_API_SECRET"),
        };

        Ok(Self {
            pagination: PaginationDefaults {
                page,
                limit,
                max_limit,
            },
            featured_limit,
            link_ttl_secs,
            signing,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var,
            expected: std::any::type_name::<T>(),
            value: raw,
        }),
    }
}
