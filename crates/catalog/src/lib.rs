//! Catalog listing engine.
//!
//! Turns a fetched product list plus one immutable [`FilterCriteria`] value
//! into the visible page: text search, category, price range, size and color
//! filters, sorting, then pagination. The pipeline itself is pure; fetching is
//! delegated to a [`ProductSource`] and the [`Storefront`] container decides
//! when a refetch is actually needed.

pub mod bounds;
pub mod config;
pub mod criteria;
pub mod engine;
pub mod pagination;
pub mod sequence;
pub mod source;
pub mod storefront;
pub mod strategy;

pub use bounds::PriceBounds;
pub use config::{CatalogConfig, ConfigError};
pub use criteria::{CriteriaCommand, DEFAULT_PAGE_SIZE, FilterCriteria, PriceRange, SortKey};
pub use engine::{CatalogPage, filter_and_sort, query};
pub use pagination::PageWindow;
pub use sequence::{RequestSequencer, Ticket};
pub use source::{InMemoryProductSource, ProductSource, SourceError};
pub use storefront::{FetchRequest, Storefront, StorefrontError};
pub use strategy::FetchPlan;
