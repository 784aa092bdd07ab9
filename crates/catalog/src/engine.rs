//! The listing pipeline: filter, sort, paginate.
//!
//! Everything here is a pure function of `(products, criteria)`. The same
//! inputs always produce the same page, so callers may memoize freely. The
//! filters are commutative, which is what lets a server-pre-filtered subset
//! flow through the same pipeline as the full listing.

use core::cmp::Ordering;

use serde::Serialize;

use storefront_core::{DomainResult, ValueObject};
use storefront_products::ProductRecord;

use crate::criteria::{FilterCriteria, SortKey};
use crate::pagination::PageWindow;

/// One rendered page of the listing plus the totals the pager needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub items: Vec<ProductRecord>,
    /// Matches across all pages.
    pub total_count: usize,
    pub total_pages: usize,
    /// Page actually served, after clamping the requested one.
    pub page: usize,
    pub page_size: usize,
}

impl ValueObject for CatalogPage {}

impl CatalogPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Run the full pipeline and return the requested page.
///
/// # Errors
///
/// - `InvalidPageSize` when `criteria.page_size <= 0`.
/// - `InvalidCriteria` when both price bounds are set and inverted.
///
/// An empty listing, or one where nothing matches, is a valid empty page.
pub fn query(products: &[ProductRecord], criteria: &FilterCriteria) -> DomainResult<CatalogPage> {
    let page_size = criteria.validate()?;
    let matched = filter_and_sort(products, criteria)?;

    let window = PageWindow::locate(matched.len(), criteria.page, page_size);
    let items = matched
        .get(window.range())
        .unwrap_or_default()
        .iter()
        .map(|product| (*product).clone())
        .collect();

    tracing::debug!(
        total = matched.len(),
        page = window.page,
        total_pages = window.total_pages,
        "catalog page computed"
    );

    Ok(CatalogPage {
        items,
        total_count: matched.len(),
        total_pages: window.total_pages,
        page: window.page,
        page_size,
    })
}

/// Filter and sort without paginating.
///
/// Filters run in order: text, category, price, size, color. Sorting is
/// stable, so ties keep fetch order.
pub fn filter_and_sort<'a>(
    products: &'a [ProductRecord],
    criteria: &FilterCriteria,
) -> DomainResult<Vec<&'a ProductRecord>> {
    criteria.validate()?;

    let needle = criteria.search_text.to_lowercase();
    let category = criteria.active_category().map(str::to_lowercase);
    let colors: Vec<String> = criteria
        .color_filters
        .iter()
        .map(|c| c.trim().to_lowercase())
        .collect();

    let mut matched: Vec<&ProductRecord> = products.iter().collect();
    let fetched = matched.len();

    if !needle.is_empty() {
        matched.retain(|p| p.title().to_lowercase().contains(&needle));
    }
    if let Some(category) = &category {
        matched.retain(|p| p.category().to_lowercase() == *category);
    }
    if let Some(min) = criteria.price_min {
        matched.retain(|p| p.price() >= min);
    }
    if let Some(max) = criteria.price_max {
        matched.retain(|p| p.price() <= max);
    }
    if !criteria.size_filters.is_empty() {
        matched.retain(|p| {
            p.sizes()
                .iter()
                .any(|size| criteria.size_filters.iter().any(|wanted| wanted.trim() == size))
        });
    }
    if !colors.is_empty() {
        matched.retain(|p| {
            p.colors()
                .iter()
                .any(|color| colors.contains(&color.to_lowercase()))
        });
    }

    tracing::trace!(fetched, matched = matched.len(), "filters applied");

    match criteria.sort_key {
        SortKey::Default => {}
        SortKey::PriceAsc => matched.sort_by(|a, b| a.price().cmp(&b.price())),
        SortKey::PriceDesc => matched.sort_by(|a, b| b.price().cmp(&a.price())),
        SortKey::TitleAsc => matched.sort_by(|a, b| collate(a.title(), b.title())),
    }

    Ok(matched)
}

/// Alphabetical title order: letters compare case-insensitively first, and
/// only an otherwise-equal pair is ordered lowercase before uppercase.
fn collate(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);

    folded_a.cmp(folded_b).then_with(|| b.cmp(a))
}
