//! Command-line arguments and their translation into criteria commands.

use std::path::PathBuf;

use clap::Parser;
use rust_decimal::Decimal;

use storefront_catalog::{CriteriaCommand, PriceBounds, PriceRange, SortKey};
use storefront_core::{DomainResult, ProductId};

#[derive(Debug, Parser)]
#[command(name = "storefront")]
#[command(about = "Filter, sort and paginate a product listing")]
pub struct Cli {
    /// Product payload as returned by the API (`{"allProducts": [...]}` or a bare array)
    pub payload: PathBuf,

    /// Case-insensitive title substring
    #[arg(long)]
    pub search: Option<String>,

    /// Exact category (case-insensitive)
    #[arg(long)]
    pub category: Option<String>,

    /// Lowest raw price to include (defaults to the cheapest product)
    #[arg(long)]
    pub min_price: Option<Decimal>,

    /// Highest raw price to include (defaults to the most expensive product)
    #[arg(long)]
    pub max_price: Option<Decimal>,

    /// Size to match; repeat for any-of
    #[arg(long = "size")]
    pub sizes: Vec<String>,

    /// Color to match (case-insensitive); repeat for any-of
    #[arg(long = "color")]
    pub colors: Vec<String>,

    /// default, priceAsc, priceDesc or titleAsc
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// 1-indexed page
    #[arg(long, default_value_t = 1)]
    pub page: i64,

    /// Overrides STOREFRONT_PAGE_SIZE
    #[arg(long)]
    pub page_size: Option<i64>,

    /// Print products related to this id instead of a page
    #[arg(long)]
    pub related: Option<ProductId>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    /// Commands that take the default listing to the requested one.
    ///
    /// A one-sided price bound is completed from the observed `bounds`. The
    /// page is set last since every other command resets it.
    pub fn commands(&self, bounds: Option<PriceBounds>) -> DomainResult<Vec<CriteriaCommand>> {
        let mut commands = Vec::new();

        if let Some(search) = &self.search {
            commands.push(CriteriaCommand::SetSearch(search.clone()));
        }
        if let Some(category) = &self.category {
            commands.push(CriteriaCommand::SetCategory(Some(category.clone())));
        }
        if let Some(range) = self.price_range(bounds)? {
            commands.push(CriteriaCommand::SetPriceRange(range));
        }
        commands.extend(self.sizes.iter().cloned().map(CriteriaCommand::ToggleSize));
        commands.extend(self.colors.iter().cloned().map(CriteriaCommand::ToggleColor));
        if let Some(sort) = self.sort {
            commands.push(CriteriaCommand::SetSort(sort));
        }
        if self.page != 1 {
            commands.push(CriteriaCommand::SetPage(self.page));
        }

        Ok(commands)
    }

    fn price_range(&self, bounds: Option<PriceBounds>) -> DomainResult<Option<PriceRange>> {
        let (min, max) = match (self.min_price, self.max_price, bounds) {
            (None, None, _) => return Ok(None),
            (Some(min), Some(max), _) => (min, max),
            (min, max, Some(bounds)) => (min.unwrap_or(bounds.min()), max.unwrap_or(bounds.max())),
            (min, max, None) => (min.unwrap_or(Decimal::ZERO), max.unwrap_or(Decimal::MAX)),
        };
        PriceRange::new(min, max).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use storefront_core::DomainError;
    use storefront_products::ProductRecord;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("storefront").chain(args.iter().copied())).unwrap()
    }

    fn bounds(min: i64, max: i64) -> Option<PriceBounds> {
        let products = [
            ProductRecord::new(ProductId::new(1), "Low", Decimal::from(min)).unwrap(),
            ProductRecord::new(ProductId::new(2), "High", Decimal::from(max)).unwrap(),
        ];
        PriceBounds::observe(&products)
    }

    #[test]
    fn no_flags_means_no_commands() {
        let cli = parse(&["products.json"]);
        assert!(cli.commands(None).unwrap().is_empty());
    }

    #[test]
    fn flags_become_commands_with_page_last() {
        let cli = parse(&[
            "products.json",
            "--search",
            "shirt",
            "--size",
            "M",
            "--size",
            "XXL",
            "--color",
            "red",
            "--sort",
            "price_asc",
            "--page",
            "2",
        ]);

        let commands = cli.commands(None).unwrap();
        assert_eq!(
            commands,
            vec![
                CriteriaCommand::SetSearch("shirt".into()),
                CriteriaCommand::ToggleSize("M".into()),
                CriteriaCommand::ToggleSize("XXL".into()),
                CriteriaCommand::ToggleColor("red".into()),
                CriteriaCommand::SetSort(SortKey::PriceAsc),
                CriteriaCommand::SetPage(2),
            ]
        );
    }

    #[test]
    fn one_sided_price_uses_observed_bound() {
        let cli = parse(&["products.json", "--min-price", "30"]);
        let commands = cli.commands(bounds(10, 90)).unwrap();

        let expected = PriceRange::new(Decimal::from(30), Decimal::from(90)).unwrap();
        assert_eq!(commands, vec![CriteriaCommand::SetPriceRange(expected)]);
    }

    #[test]
    fn inverted_price_flags_are_rejected() {
        let cli = parse(&["products.json", "--min-price", "60", "--max-price", "40"]);
        assert!(matches!(
            cli.commands(bounds(10, 90)),
            Err(DomainError::InvalidCriteria(_))
        ));
    }

    #[test]
    fn related_takes_a_product_id() {
        let cli = parse(&["products.json", "--related", "7"]);
        assert_eq!(cli.related, Some(ProductId::new(7)));
        assert!(Cli::try_parse_from(["storefront", "products.json", "--related", "abc"]).is_err());
    }
}
