//! Lookups over an already-fetched product listing.

use storefront_core::{DomainError, DomainResult, Entity, ProductId};

use crate::product::{ProductRecord, same_label};

/// Find a product by id.
pub fn find_by_id(products: &[ProductRecord], id: ProductId) -> DomainResult<&ProductRecord> {
    products
        .iter()
        .find(|p| p.id_typed() == id)
        .ok_or_else(DomainError::not_found)
}

/// Find a product by its exact title, the key product pages are addressed by.
pub fn find_by_title<'a>(
    products: &'a [ProductRecord],
    title: &str,
) -> DomainResult<&'a ProductRecord> {
    let title = title.trim();
    products
        .iter()
        .find(|p| p.title() == title)
        .ok_or_else(DomainError::not_found)
}

/// Products in the same category as `product`, excluding `product` itself,
/// in listing order and capped at `limit`.
///
/// Category comparison ignores case (Unicode-aware). A product without a
/// category has no related items.
pub fn related_products<'a>(
    products: &'a [ProductRecord],
    product: &ProductRecord,
    limit: usize,
) -> Vec<&'a ProductRecord> {
    if product.category().is_empty() {
        return Vec::new();
    }

    products
        .iter()
        .filter(|candidate| !candidate.same_identity_as(product))
        .filter(|candidate| same_label(candidate.category(), product.category()))
        .take(limit)
        .collect()
}
