//! Observed price bounds of a listing, used as the default price window.

use rust_decimal::Decimal;
use serde::Serialize;

use storefront_products::ProductRecord;

use crate::criteria::{FilterCriteria, PriceRange};

/// Cheapest and most expensive raw price in a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PriceBounds {
    range: PriceRange,
}

impl PriceBounds {
    /// Bounds of `products`, or `None` for an empty listing.
    pub fn observe(products: &[ProductRecord]) -> Option<Self> {
        let mut prices = products.iter().map(ProductRecord::price);
        let first = prices.next()?;

        let (min, max) = prices.fold((first, first), |(min, max), price| {
            (min.min(price), max.max(price))
        });
        PriceRange::new(min, max).ok().map(|range| Self { range })
    }

    pub fn min(&self) -> Decimal {
        self.range.min()
    }

    pub fn max(&self) -> Decimal {
        self.range.max()
    }

    pub fn as_range(&self) -> PriceRange {
        self.range
    }

    /// The price window the criteria effectively select: missing bounds fall
    /// back to the observed ones and each bound is clamped into the observed
    /// range, so the result always satisfies `min <= max`.
    pub fn resolve(&self, criteria: &FilterCriteria) -> PriceRange {
        let min = criteria
            .price_min
            .unwrap_or(self.min())
            .clamp(self.min(), self.max());
        let max = criteria
            .price_max
            .unwrap_or(self.max())
            .clamp(self.min(), self.max())
            .max(min);

        PriceRange::new(min, max).unwrap_or(self.range)
    }
}
