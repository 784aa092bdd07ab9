//! Product source abstraction (the fetch collaborator).
//!
//! Transport is not this crate's concern: a source turns a [`FetchPlan`]
//! into product records however it likes (HTTP client, fixture file, test
//! double). The in-memory source serves every plan from a fixed listing.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;

use storefront_products::{ProductParseError, ProductRecord, parse_product_list, same_label};

use crate::strategy::FetchPlan;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("product source unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Parse(#[from] ProductParseError),
}

/// Something that can answer product listing requests.
pub trait ProductSource: Send + Sync {
    fn fetch(&self, plan: &FetchPlan) -> Result<Vec<ProductRecord>, SourceError>;
}

impl<S> ProductSource for Arc<S>
where
    S: ProductSource + ?Sized,
{
    fn fetch(&self, plan: &FetchPlan) -> Result<Vec<ProductRecord>, SourceError> {
        (**self).fetch(plan)
    }
}

/// In-memory product source for tests, fixtures and the CLI.
///
/// Answers filtered plans the way the API does: by category (exact,
/// case-insensitive), by color (any match, case-insensitive) or by raw price
/// range (inclusive). Counts requests so callers can assert on refetches.
#[derive(Debug, Default)]
pub struct InMemoryProductSource {
    products: Vec<ProductRecord>,
    fetches: AtomicUsize,
}

impl InMemoryProductSource {
    pub fn new(products: Vec<ProductRecord>) -> Self {
        Self {
            products,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Build a source from a raw API payload (any listing envelope).
    pub fn from_payload(payload: &str) -> Result<Self, SourceError> {
        Ok(Self::new(parse_product_list(payload)?))
    }

    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    /// Number of `fetch` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl ProductSource for InMemoryProductSource {
    fn fetch(&self, plan: &FetchPlan) -> Result<Vec<ProductRecord>, SourceError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);

        let wanted = |product: &ProductRecord| match plan {
            FetchPlan::All => true,
            FetchPlan::ByCategory { name } => same_label(product.category(), name),
            FetchPlan::ByColor { color } => product.colors().iter().any(|c| same_label(c, color)),
            FetchPlan::ByPriceRange { range } => range.contains(product.price()),
        };

        let products: Vec<ProductRecord> =
            self.products.iter().filter(|p| wanted(*p)).cloned().collect();
        tracing::debug!(%plan, count = products.len(), "served in-memory fetch");
        Ok(products)
    }
}
