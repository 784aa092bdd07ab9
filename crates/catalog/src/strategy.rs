//! Fetch strategy: which request to send to the product API for a given set
//! of criteria.
//!
//! The API offers one unfiltered listing plus single-filter lookups (by
//! category, by color, by price range). Whatever plan is chosen, the engine
//! still applies every filter to the result, so a plan only ever reduces how
//! much is transferred; it never changes what the shopper sees.

use serde::{Deserialize, Serialize};

use storefront_products::same_label;

use crate::criteria::{FilterCriteria, PriceRange};

/// A request against the product API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FetchPlan {
    /// `GET /products`
    All,
    /// `POST /products/byCategory`
    ByCategory { name: String },
    /// Server-side color lookup.
    ByColor { color: String },
    /// Server-side price range lookup.
    ByPriceRange { range: PriceRange },
}

impl FetchPlan {
    /// Choose the narrowest single-filter request the criteria allow.
    ///
    /// Priority: category, then a single selected color, then an explicit
    /// two-sided price range. Several colors are an OR and cannot be expressed
    /// as one lookup, so they fall through. With `server_filtering` off the
    /// plan is always [`FetchPlan::All`].
    pub fn for_criteria(criteria: &FilterCriteria, server_filtering: bool) -> Self {
        if !server_filtering {
            return FetchPlan::All;
        }

        if let Some(category) = criteria.active_category() {
            return FetchPlan::ByCategory {
                name: category.to_string(),
            };
        }

        if let [color] = criteria.color_filters.as_slice() {
            let color = color.trim();
            if !color.is_empty() {
                return FetchPlan::ByColor {
                    color: color.to_string(),
                };
            }
        }

        match criteria.price_range() {
            Ok(Some(range)) => FetchPlan::ByPriceRange { range },
            _ => FetchPlan::All,
        }
    }

    pub fn is_filtered(&self) -> bool {
        !matches!(self, FetchPlan::All)
    }

    /// Whether a listing fetched with `self` already contains every product
    /// `other` would return, so `other` can be served from it.
    pub fn covers(&self, other: &FetchPlan) -> bool {
        match (self, other) {
            (FetchPlan::All, _) => true,
            (FetchPlan::ByCategory { name: a }, FetchPlan::ByCategory { name: b }) => {
                same_label(a, b)
            }
            (FetchPlan::ByColor { color: a }, FetchPlan::ByColor { color: b }) => same_label(a, b),
            (FetchPlan::ByPriceRange { range: a }, FetchPlan::ByPriceRange { range: b }) => {
                a.covers(b)
            }
            _ => false,
        }
    }
}

impl core::fmt::Display for FetchPlan {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FetchPlan::All => write!(f, "all"),
            FetchPlan::ByCategory { name } => write!(f, "category={name}"),
            FetchPlan::ByColor { color } => write!(f, "color={color}"),
            FetchPlan::ByPriceRange { range } => {
                write!(f, "price={}..={}", range.min(), range.max())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::criteria::CriteriaCommand;

    fn range(min: i64, max: i64) -> PriceRange {
        PriceRange::new(Decimal::from(min), Decimal::from(max)).unwrap()
    }

    #[test]
    fn unfiltered_criteria_fetch_everything() {
        assert_eq!(
            FetchPlan::for_criteria(&FilterCriteria::default(), true),
            FetchPlan::All
        );
    }

    #[test]
    fn category_takes_priority() {
        let criteria = FilterCriteria::default()
            .apply(CriteriaCommand::ToggleColor("Red".into()))
            .apply(CriteriaCommand::SetCategory(Some("Men".into())));

        assert_eq!(
            FetchPlan::for_criteria(&criteria, true),
            FetchPlan::ByCategory { name: "Men".into() }
        );
    }

    #[test]
    fn single_color_is_pushed_down_but_several_are_not() {
        let one = FilterCriteria::default().apply(CriteriaCommand::ToggleColor("Red".into()));
        assert_eq!(
            FetchPlan::for_criteria(&one, true),
            FetchPlan::ByColor { color: "Red".into() }
        );

        let two = one.apply(CriteriaCommand::ToggleColor("Blue".into()));
        assert_eq!(FetchPlan::for_criteria(&two, true), FetchPlan::All);
    }

    #[test]
    fn two_sided_price_range_is_pushed_down() {
        let criteria =
            FilterCriteria::default().apply(CriteriaCommand::SetPriceRange(range(10, 40)));
        assert_eq!(
            FetchPlan::for_criteria(&criteria, true),
            FetchPlan::ByPriceRange { range: range(10, 40) }
        );

        let one_sided = FilterCriteria {
            price_min: Some(Decimal::from(10)),
            ..FilterCriteria::default()
        };
        assert_eq!(FetchPlan::for_criteria(&one_sided, true), FetchPlan::All);
    }

    #[test]
    fn server_filtering_disabled_always_fetches_all() {
        let criteria =
            FilterCriteria::default().apply(CriteriaCommand::SetCategory(Some("Men".into())));
        assert_eq!(FetchPlan::for_criteria(&criteria, false), FetchPlan::All);
    }

    #[test]
    fn coverage_rules() {
        let men = FetchPlan::ByCategory { name: "Men".into() };
        let men_lower = FetchPlan::ByCategory { name: "men".into() };
        let red = FetchPlan::ByColor { color: "Red".into() };
        let wide = FetchPlan::ByPriceRange { range: range(0, 100) };
        let narrow = FetchPlan::ByPriceRange { range: range(10, 20) };

        assert!(FetchPlan::All.covers(&men));
        assert!(men.covers(&men_lower));
        assert!(!men.covers(&FetchPlan::All));
        assert!(!men.covers(&red));
        assert!(wide.covers(&narrow));
        assert!(!narrow.covers(&wide));
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(FetchPlan::All.to_string(), "all");
        assert_eq!(
            FetchPlan::ByPriceRange { range: range(1, 2) }.to_string(),
            "price=1..=2"
        );
    }
}
