use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, ProductId};

use crate::wire::WireProduct;

/// A product as listed by the storefront API.
///
/// Records are read-only snapshots: every fetch produces fresh values and the
/// catalog never mutates them. Construction enforces `price >= 0` and
/// `discount <= 100`; the wire decoder clamps instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WireProduct")]
pub struct ProductRecord {
    id: ProductId,
    title: String,
    description: String,
    price: Decimal,
    discount: u8,
    category: String,
    sizes: Vec<String>,
    colors: Vec<String>,
    stock: u32,
    images: Vec<String>,
}

impl ProductRecord {
    /// Create a record with the required fields; everything else starts empty.
    pub fn new(id: ProductId, title: impl Into<String>, price: Decimal) -> DomainResult<Self> {
        if price < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "price cannot be negative (got {price})"
            )));
        }

        Ok(Self {
            id,
            title: title.into(),
            description: String::new(),
            price,
            discount: 0,
            category: String::new(),
            sizes: Vec::new(),
            colors: Vec::new(),
            stock: 0,
            images: Vec::new(),
        })
    }

    /// Build a record from already-normalized parts. Used by the wire decoder,
    /// which guarantees the invariants itself.
    pub(crate) fn from_normalized_parts(
        id: ProductId,
        title: String,
        description: String,
        price: Decimal,
        discount: u8,
        category: String,
        sizes: Vec<String>,
        colors: Vec<String>,
        stock: u32,
        images: Vec<String>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            price,
            discount,
            category,
            sizes,
            colors,
            stock,
            images,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the discount percentage (`0..=100`).
    pub fn with_discount(mut self, discount: u8) -> DomainResult<Self> {
        if discount > 100 {
            return Err(DomainError::validation(format!(
                "discount must be within 0..=100 (got {discount})"
            )));
        }
        self.discount = discount;
        Ok(self)
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sizes = normalize_labels(sizes);
        self
    }

    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.colors = normalize_labels(colors);
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.images = normalize_labels(images);
        self
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Raw list price, before any discount.
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Discount percentage in `0..=100`; `0` means no discount.
    pub fn discount(&self) -> u8 {
        self.discount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn sizes(&self) -> &[String] {
        &self.sizes
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn has_discount(&self) -> bool {
        self.discount > 0
    }

    /// Price after applying the discount percentage.
    ///
    /// `price * (100 - discount) / 100` when discounted, otherwise `price`.
    /// Prices too large to scale exactly are divided first, which may round
    /// but never overflows.
    pub fn effective_price(&self) -> Decimal {
        if !self.has_discount() {
            return self.price;
        }
        let remaining = Decimal::from(100 - u32::from(self.discount));
        self.price
            .checked_mul(remaining)
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .unwrap_or_else(|| self.price / Decimal::ONE_HUNDRED * remaining)
    }

    /// Amount taken off the list price by the discount.
    pub fn savings(&self) -> Decimal {
        self.price - self.effective_price()
    }

    /// Out-of-stock products are still listed; they just cannot be added to a cart.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

impl Entity for ProductRecord {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Case-insensitive label equality (categories, colors). Uses full Unicode
/// lowercasing so every comparison in the catalog agrees.
pub fn same_label(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Normalize a list of labels (sizes, colors, image URLs) into an ordered set:
/// trimmed, empty entries dropped, first occurrence wins.
pub fn normalize_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for label in labels {
        let label = label.as_ref().trim();
        if label.is_empty() || out.iter().any(|existing| existing == label) {
            continue;
        }
        out.push(label.to_string());
    }
    out
}
