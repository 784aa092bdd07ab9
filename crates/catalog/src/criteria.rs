//! Filter criteria: the single immutable value describing what the shopper
//! is looking at.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, ValueObject};
use storefront_products::same_label;

/// Products per page on the shop listing.
pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Keep fetch order.
    #[default]
    Default,
    /// Raw price, cheapest first.
    PriceAsc,
    /// Raw price, most expensive first.
    PriceDesc,
    /// Title, alphabetical.
    TitleAsc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Default => "default",
            SortKey::PriceAsc => "priceAsc",
            SortKey::PriceDesc => "priceDesc",
            SortKey::TitleAsc => "titleAsc",
        }
    }
}

impl core::fmt::Display for SortKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "" | "default" => Ok(SortKey::Default),
            "priceasc" => Ok(SortKey::PriceAsc),
            "pricedesc" => Ok(SortKey::PriceDesc),
            "titleasc" => Ok(SortKey::TitleAsc),
            _ => Err(DomainError::validation(format!("unknown sort key: {s}"))),
        }
    }
}

/// Inclusive price interval over raw (undiscounted) prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPriceRange")]
pub struct PriceRange {
    min: Decimal,
    max: Decimal,
}

impl PriceRange {
    /// Build a range; an inverted range is a caller bug and is rejected.
    pub fn new(min: Decimal, max: Decimal) -> DomainResult<Self> {
        if min > max {
            return Err(DomainError::invalid_criteria(format!(
                "priceMin ({min}) is greater than priceMax ({max})"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Decimal {
        self.min
    }

    pub fn max(&self) -> Decimal {
        self.max
    }

    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }

    /// Whether every price in `other` is also in `self`.
    pub fn covers(&self, other: &PriceRange) -> bool {
        self.min <= other.min && other.max <= self.max
    }
}

impl ValueObject for PriceRange {}

#[derive(Deserialize)]
struct RawPriceRange {
    min: Decimal,
    max: Decimal,
}

impl TryFrom<RawPriceRange> for PriceRange {
    type Error = DomainError;

    fn try_from(raw: RawPriceRange) -> Result<Self, Self::Error> {
        PriceRange::new(raw.min, raw.max)
    }
}

/// Everything that decides which products are visible, in which order, and
/// which page of them.
///
/// Price bounds left as `None` fall back to the observed bounds of the
/// listing, which never excludes anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the title; empty disables the filter.
    pub search_text: String,
    /// Exact category, case-insensitive.
    pub category: Option<String>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    /// A product matches when it offers ANY of these sizes.
    pub size_filters: Vec<String>,
    /// A product matches when it comes in ANY of these colors (case-insensitive).
    pub color_filters: Vec<String>,
    pub sort_key: SortKey,
    /// 1-indexed; clamped into range when the page is computed.
    pub page: i64,
    pub page_size: i64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            category: None,
            price_min: None,
            price_max: None,
            size_filters: Vec::new(),
            color_filters: Vec::new(),
            sort_key: SortKey::Default,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ValueObject for FilterCriteria {}

impl FilterCriteria {
    pub fn with_page_size(page_size: i64) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    /// Check caller-contract violations. Returns the page size as `usize`.
    ///
    /// - [`DomainError::InvalidPageSize`] when `page_size <= 0`.
    /// - [`DomainError::InvalidCriteria`] when both price bounds are given and
    ///   `price_min > price_max`.
    pub fn validate(&self) -> DomainResult<usize> {
        let page_size = usize::try_from(self.page_size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or_else(|| DomainError::invalid_page_size(self.page_size))?;

        self.price_range()?;

        Ok(page_size)
    }

    /// The explicit price range, when both bounds are set.
    pub fn price_range(&self) -> DomainResult<Option<PriceRange>> {
        match (self.price_min, self.price_max) {
            (Some(min), Some(max)) => PriceRange::new(min, max).map(Some),
            _ => Ok(None),
        }
    }

    /// Whether any filter (not sort or page) narrows the listing.
    pub fn has_filters(&self) -> bool {
        !self.search_text.is_empty()
            || self.active_category().is_some()
            || self.price_min.is_some()
            || self.price_max.is_some()
            || !self.size_filters.is_empty()
            || !self.color_filters.is_empty()
    }

    /// Category filter, ignoring a blank value.
    pub fn active_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Return the criteria that result from `command`.
    ///
    /// Any change other than [`CriteriaCommand::SetPage`] sends the shopper
    /// back to page 1. `Clear` keeps only the page size: the sort goes back to
    /// [`SortKey::Default`], not to a configured default. Use
    /// [`FilterCriteria::apply_with_defaults`] when one is configured.
    pub fn apply(&self, command: CriteriaCommand) -> Self {
        self.apply_with_defaults(command, &Self::with_page_size(self.page_size))
    }

    /// Like [`FilterCriteria::apply`], but `Clear` yields `defaults`.
    pub fn apply_with_defaults(&self, command: CriteriaCommand, defaults: &Self) -> Self {
        let mut next = self.clone();

        match command {
            CriteriaCommand::SetSearch(text) => next.search_text = text.trim().to_string(),
            CriteriaCommand::SetCategory(category) => {
                next.category = category
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty());
            }
            CriteriaCommand::SetPriceRange(range) => {
                next.price_min = Some(range.min());
                next.price_max = Some(range.max());
            }
            CriteriaCommand::ClearPriceRange => {
                next.price_min = None;
                next.price_max = None;
            }
            CriteriaCommand::ToggleSize(size) => {
                toggle(&mut next.size_filters, &size, |a, b| a == b)
            }
            CriteriaCommand::ToggleColor(color) => {
                toggle(&mut next.color_filters, &color, same_label)
            }
            CriteriaCommand::SetSort(sort_key) => next.sort_key = sort_key,
            CriteriaCommand::SetPage(page) => {
                next.page = page;
                return next;
            }
            CriteriaCommand::Clear => next = defaults.clone(),
        }

        if next != *self {
            next.page = 1;
        }
        next
    }
}

fn toggle(values: &mut Vec<String>, value: &str, same: impl Fn(&str, &str) -> bool) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }

    let before = values.len();
    values.retain(|existing| !same(existing.as_str(), value));
    if values.len() == before {
        values.push(value.to_string());
    }
}

/// A single shopper interaction with the listing controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CriteriaCommand {
    SetSearch(String),
    SetCategory(Option<String>),
    SetPriceRange(PriceRange),
    ClearPriceRange,
    ToggleSize(String),
    ToggleColor(String),
    SetSort(SortKey),
    SetPage(i64),
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn defaults_match_shop_listing() {
        let criteria = FilterCriteria::default();
        assert_eq!(criteria.page, 1);
        assert_eq!(criteria.page_size, 12);
        assert_eq!(criteria.sort_key, SortKey::Default);
        assert!(!criteria.has_filters());
    }

    #[test]
    fn validate_rejects_non_positive_page_size() {
        for size in [0, -1, -12] {
            let err = FilterCriteria::with_page_size(size).validate().unwrap_err();
            assert_eq!(err, DomainError::InvalidPageSize(size));
        }
        assert_eq!(FilterCriteria::with_page_size(5).validate().unwrap(), 5);
    }

    #[test]
    fn validate_rejects_inverted_price_range() {
        let criteria = FilterCriteria {
            price_min: Some(dec(60)),
            price_max: Some(dec(40)),
            ..FilterCriteria::default()
        };
        assert!(matches!(
            criteria.validate(),
            Err(DomainError::InvalidCriteria(_))
        ));
    }

    #[test]
    fn one_sided_price_bound_is_valid() {
        let criteria = FilterCriteria {
            price_min: Some(dec(60)),
            ..FilterCriteria::default()
        };
        assert!(criteria.validate().is_ok());
        assert_eq!(criteria.price_range().unwrap(), None);
        assert!(criteria.has_filters());
    }

    #[test]
    fn price_range_rejects_inversion_and_checks_coverage() {
        assert!(PriceRange::new(dec(5), dec(1)).is_err());

        let wide = PriceRange::new(dec(0), dec(100)).unwrap();
        let narrow = PriceRange::new(dec(10), dec(20)).unwrap();
        assert!(wide.covers(&narrow));
        assert!(!narrow.covers(&wide));
        assert!(wide.contains(dec(100)));
        assert!(!narrow.contains(dec(21)));
    }

    #[test]
    fn sort_key_parses_common_spellings() {
        assert_eq!("priceAsc".parse::<SortKey>().unwrap(), SortKey::PriceAsc);
        assert_eq!("price_desc".parse::<SortKey>().unwrap(), SortKey::PriceDesc);
        assert_eq!("title-asc".parse::<SortKey>().unwrap(), SortKey::TitleAsc);
        assert_eq!("".parse::<SortKey>().unwrap(), SortKey::Default);
        assert!("cheapest".parse::<SortKey>().is_err());
    }

    #[test]
    fn filter_change_resets_page() {
        let on_page_three = FilterCriteria::default().apply(CriteriaCommand::SetPage(3));
        assert_eq!(on_page_three.page, 3);

        let searched = on_page_three.apply(CriteriaCommand::SetSearch("  hoodie ".into()));
        assert_eq!(searched.search_text, "hoodie");
        assert_eq!(searched.page, 1);
    }

    #[test]
    fn no_op_command_keeps_page() {
        let on_page_two = FilterCriteria::default().apply(CriteriaCommand::SetPage(2));
        let same = on_page_two.apply(CriteriaCommand::SetSort(SortKey::Default));
        assert_eq!(same.page, 2);
    }

    #[test]
    fn toggles_add_then_remove() {
        let criteria = FilterCriteria::default()
            .apply(CriteriaCommand::ToggleSize("M".into()))
            .apply(CriteriaCommand::ToggleColor("Blue".into()))
            .apply(CriteriaCommand::ToggleSize("L".into()));
        assert_eq!(criteria.size_filters, vec!["M", "L"]);
        assert_eq!(criteria.color_filters, vec!["Blue"]);

        let criteria = criteria
            .apply(CriteriaCommand::ToggleSize("M".into()))
            .apply(CriteriaCommand::ToggleColor("blue".into()));
        assert_eq!(criteria.size_filters, vec!["L"]);
        assert!(criteria.color_filters.is_empty());
    }

    #[test]
    fn blank_category_clears_filter() {
        let criteria = FilterCriteria::default()
            .apply(CriteriaCommand::SetCategory(Some("Men".into())))
            .apply(CriteriaCommand::SetCategory(Some("   ".into())));
        assert_eq!(criteria.category, None);
    }

    #[test]
    fn clear_keeps_page_size_only() {
        let criteria = FilterCriteria::with_page_size(24)
            .apply(CriteriaCommand::SetSearch("shirt".into()))
            .apply(CriteriaCommand::SetSort(SortKey::PriceDesc))
            .apply(CriteriaCommand::SetPriceRange(PriceRange::new(dec(1), dec(2)).unwrap()))
            .apply(CriteriaCommand::Clear);

        assert_eq!(criteria, FilterCriteria::with_page_size(24));
        assert_eq!(criteria.sort_key, SortKey::Default);
    }

    #[test]
    fn clear_with_defaults_restores_configured_sort() {
        let defaults = FilterCriteria {
            sort_key: SortKey::TitleAsc,
            ..FilterCriteria::with_page_size(6)
        };
        let criteria = defaults
            .apply(CriteriaCommand::SetSort(SortKey::PriceAsc))
            .apply(CriteriaCommand::ToggleColor("Red".into()))
            .apply_with_defaults(CriteriaCommand::Clear, &defaults);

        assert_eq!(criteria, defaults);

        let toggled =
            defaults.apply_with_defaults(CriteriaCommand::ToggleSize("M".into()), &defaults);
        assert_eq!(toggled, defaults.apply(CriteriaCommand::ToggleSize("M".into())));
    }

    #[test]
    fn criteria_deserialize_from_camel_case_with_defaults() {
        let criteria: FilterCriteria = serde_json::from_str(
            r#"{"searchText": "red", "colorFilters": ["Red"], "sortKey": "priceAsc", "priceMax": 100}"#,
        )
        .unwrap();

        assert_eq!(criteria.search_text, "red");
        assert_eq!(criteria.color_filters, vec!["Red"]);
        assert_eq!(criteria.sort_key, SortKey::PriceAsc);
        assert_eq!(criteria.price_max, Some(dec(100)));
        assert_eq!(criteria.page, 1);
        assert_eq!(criteria.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn inverted_price_range_is_rejected_on_deserialize() {
        let err = serde_json::from_str::<PriceRange>(r#"{"min": 60, "max": 40}"#);
        assert!(err.is_err());
    }
}
