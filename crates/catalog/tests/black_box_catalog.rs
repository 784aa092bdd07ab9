use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use storefront_catalog::{
    CatalogConfig, CatalogPage, CriteriaCommand, FetchPlan, FilterCriteria, InMemoryProductSource,
    PriceRange, ProductSource, SortKey, Storefront, StorefrontError, query,
};
use storefront_core::{DomainError, ProductId};
use storefront_products::{ProductRecord, parse_product_list};

fn shirt_and_jeans() -> Vec<ProductRecord> {
    let payload = json!({
        "allProducts": [
            {"id": 1, "title": "Red Shirt", "price": 20, "discount": 0, "sizes": "M", "colors": "Red"},
            {"id": 2, "title": "Blue Jeans", "price": "50", "discount": 10, "sizes": "L", "colors": "Blue"}
        ]
    });
    parse_product_list(&payload.to_string()).unwrap()
}

fn titles(page: &CatalogPage) -> Vec<&str> {
    page.items.iter().map(ProductRecord::title).collect()
}

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

#[test]
fn price_ascending_over_full_range() {
    let criteria = FilterCriteria {
        price_min: Some(dec(0)),
        price_max: Some(dec(100)),
        sort_key: SortKey::PriceAsc,
        ..FilterCriteria::default()
    };

    let page = query(&shirt_and_jeans(), &criteria).unwrap();

    assert_eq!(titles(&page), vec!["Red Shirt", "Blue Jeans"]);
    assert_eq!(page.total_count, 2);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn color_filter_selects_single_match() {
    let criteria = FilterCriteria {
        color_filters: vec!["Blue".into()],
        ..FilterCriteria::default()
    };

    let page = query(&shirt_and_jeans(), &criteria).unwrap();

    assert_eq!(titles(&page), vec!["Blue Jeans"]);
    assert_eq!(page.total_count, 1);
}

#[test]
fn last_page_of_twenty_five_holds_one_item() {
    let products: Vec<ProductRecord> = (1..=25)
        .map(|i| ProductRecord::new(ProductId::new(i), format!("Tee {i}"), dec(10)).unwrap())
        .collect();
    let criteria = FilterCriteria {
        page: 3,
        ..FilterCriteria::with_page_size(12)
    };

    let page = query(&products, &criteria).unwrap();

    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page, 3);
    assert_eq!(titles(&page), vec!["Tee 25"]);
}

#[test]
fn inverted_price_range_is_rejected() {
    let criteria = FilterCriteria {
        price_min: Some(dec(60)),
        price_max: Some(dec(40)),
        ..FilterCriteria::default()
    };

    let err = query(&shirt_and_jeans(), &criteria).unwrap_err();

    assert!(matches!(err, DomainError::InvalidCriteria(_)));
}

#[test]
fn size_filters_match_any_selected_size() {
    let products = vec![
        ProductRecord::new(ProductId::new(1), "Linen Shirt", dec(30))
            .unwrap()
            .with_sizes(["M", "L"]),
        ProductRecord::new(ProductId::new(2), "Silk Scarf", dec(15)).unwrap(),
    ];
    let criteria = FilterCriteria {
        size_filters: vec!["M".into(), "XXL".into()],
        ..FilterCriteria::default()
    };

    let page = query(&products, &criteria).unwrap();

    assert_eq!(titles(&page), vec!["Linen Shirt"]);
}

#[test]
fn empty_listing_is_one_empty_page() {
    let page = query(&[], &FilterCriteria::default()).unwrap();

    assert!(page.is_empty());
    assert_eq!(page.total_count, 0);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.page, 1);
}

#[test]
fn zero_page_size_is_rejected() {
    let err = query(&shirt_and_jeans(), &FilterCriteria::with_page_size(0)).unwrap_err();

    assert_eq!(err, DomainError::InvalidPageSize(0));
}

#[test]
fn server_filtered_subset_gives_same_page_as_full_listing() {
    let source = InMemoryProductSource::new(shirt_and_jeans());
    let criteria = FilterCriteria {
        color_filters: vec!["blue".into()],
        ..FilterCriteria::default()
    };

    let plan = FetchPlan::for_criteria(&criteria, true);
    assert_eq!(plan, FetchPlan::ByColor { color: "blue".into() });

    let subset = source.fetch(&plan).unwrap();
    let full = source.fetch(&FetchPlan::All).unwrap();

    assert_eq!(query(&subset, &criteria).unwrap(), query(&full, &criteria).unwrap());
}

#[test]
fn shopper_session_through_the_storefront() {
    let source = Arc::new(InMemoryProductSource::new(shirt_and_jeans()));
    let mut storefront = Storefront::new(Arc::clone(&source), CatalogConfig::default());

    storefront.load().unwrap();
    let page = storefront.view().unwrap();
    assert_eq!(page.total_count, 2);

    let page = storefront
        .dispatch(CriteriaCommand::SetPriceRange(PriceRange::new(dec(30), dec(60)).unwrap()))
        .unwrap();
    assert_eq!(titles(&page), vec!["Blue Jeans"]);

    let page = storefront.dispatch(CriteriaCommand::SetSearch("shirt".into())).unwrap();
    assert!(page.is_empty());

    let page = storefront.dispatch(CriteriaCommand::Clear).unwrap();
    assert_eq!(page.total_count, 2);
    assert_eq!(source.fetch_count(), 1);
}

#[test]
fn storefront_errors_carry_domain_failures() {
    let mut storefront = Storefront::new(
        InMemoryProductSource::new(shirt_and_jeans()),
        CatalogConfig::default(),
    );
    storefront.load().unwrap();

    let err = storefront.related(ProductId::new(42)).unwrap_err();
    let err: StorefrontError = err.into();

    assert!(matches!(err, StorefrontError::Domain(DomainError::NotFound)));
}
