//! Catalog configuration from environment variables.
//!
//! | Variable                      | Default   |
//! |-------------------------------|-----------|
//! | `STOREFRONT_PAGE_SIZE`        | `12`      |
//! | `STOREFRONT_DEFAULT_SORT`     | `default` |
//! | `STOREFRONT_SERVER_FILTERING` | `true`    |
//! | `STOREFRONT_RELATED_LIMIT`    | `4`       |

use std::env::VarError;

use thiserror::Error;

use crate::criteria::{DEFAULT_PAGE_SIZE, FilterCriteria, SortKey};

pub const PAGE_SIZE_VAR: &str = "STOREFRONT_PAGE_SIZE";
pub const DEFAULT_SORT_VAR: &str = "STOREFRONT_DEFAULT_SORT";
pub const SERVER_FILTERING_VAR: &str = "STOREFRONT_SERVER_FILTERING";
pub const RELATED_LIMIT_VAR: &str = "STOREFRONT_RELATED_LIMIT";

const DEFAULT_RELATED_LIMIT: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Always > 0.
    pub page_size: i64,
    pub default_sort: SortKey,
    /// Whether the fetch strategy may push filters to the API.
    pub server_filtering: bool,
    /// How many related products a product page shows.
    pub related_limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_sort: SortKey::Default,
            server_filtering: true,
            related_limit: DEFAULT_RELATED_LIMIT,
        }
    }
}

impl CatalogConfig {
    /// Load configuration from the process environment.
    ///
    /// Unparsable values fall back to their defaults with a warning; a page
    /// size of zero or less is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key))
    }

    /// Build configuration using the provided env-var lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let defaults = Self::default();

        let page_size = parse_or_default(&lookup, PAGE_SIZE_VAR, defaults.page_size);
        if page_size <= 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: PAGE_SIZE_VAR.to_string(),
                reason: format!("page size must be greater than zero (got {page_size})"),
            });
        }

        Ok(Self {
            page_size,
            default_sort: parse_or_default(&lookup, DEFAULT_SORT_VAR, defaults.default_sort),
            server_filtering: parse_or_default(
                &lookup,
                SERVER_FILTERING_VAR,
                defaults.server_filtering,
            ),
            related_limit: parse_or_default(&lookup, RELATED_LIMIT_VAR, defaults.related_limit),
        })
    }

    /// Criteria a fresh (or cleared) listing starts from.
    pub fn initial_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            sort_key: self.default_sort,
            ..FilterCriteria::with_page_size(self.page_size)
        }
    }
}

fn parse_or_default<F, T>(lookup: &F, var: &str, default: T) -> T
where
    F: Fn(&str) -> Result<String, VarError>,
    T: core::str::FromStr + core::fmt::Display,
    T::Err: core::fmt::Display,
{
    let Ok(raw) = lookup(var) else {
        return default;
    };

    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                var,
                value = %raw,
                error = %e,
                fallback = %default,
                "invalid config value; using default"
            );
            default
        }
    }
}
