//! Shopping cart arithmetic.
//!
//! A cart line is one product in one size/color variant. Line totals use the
//! discounted unit price captured when the line was created; all sums use
//! checked decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, ProductId, ValueObject};

use crate::product::ProductRecord;
use crate::wire::ProductParseError;

/// Identifies a cart line: the same product in another size or color is a
/// separate line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl LineKey {
    pub fn new(product_id: ProductId, size: Option<&str>, color: Option<&str>) -> Self {
        Self {
            product_id,
            size: variant(size),
            color: variant(color),
        }
    }
}

fn variant(label: Option<&str>) -> Option<String> {
    label.map(str::trim).filter(|l| !l.is_empty()).map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(alias = "product_id")]
    pub product_id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Discounted price of one unit.
    #[serde(alias = "final_price")]
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id, self.size.as_deref(), self.color.as_deref())
    }

    /// `unit_price * quantity`.
    pub fn line_total(&self) -> DomainResult<Decimal> {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| {
                DomainError::validation(format!("line total overflows for {}", self.product_id))
            })
    }
}

/// The shopper's cart. Lines keep insertion order; no line has quantity 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(alias = "items")]
    lines: Vec<CartLine>,
}

impl ValueObject for Cart {}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.key() == *key)
    }

    /// Add `quantity` units of a product variant at its current discounted
    /// price. An existing line for the same variant is topped up instead.
    pub fn add(
        &mut self,
        product: &ProductRecord,
        size: Option<&str>,
        color: Option<&str>,
        quantity: u32,
    ) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        if !product.in_stock() {
            return Err(DomainError::validation(format!(
                "{} is out of stock",
                product.title()
            )));
        }

        let key = LineKey::new(product.id_typed(), size, color);
        if let Some(line) = self.lines.iter_mut().find(|line| line.key() == key) {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| DomainError::validation("quantity overflows"))?;
            return Ok(());
        }

        self.lines.push(CartLine {
            product_id: key.product_id,
            title: product.title().to_string(),
            size: key.size,
            color: key.color,
            unit_price: product.effective_price(),
            quantity,
        });
        Ok(())
    }

    /// Change a line's quantity by `delta`. A result of zero or less removes
    /// the line. Returns the new quantity, or `None` when the line was removed.
    pub fn update(&mut self, key: &LineKey, delta: i64) -> DomainResult<Option<u32>> {
        let index = self
            .lines
            .iter()
            .position(|line| line.key() == *key)
            .ok_or_else(DomainError::not_found)?;

        let next = i64::from(self.lines[index].quantity).saturating_add(delta);
        if next <= 0 {
            self.lines.remove(index);
            return Ok(None);
        }

        let quantity = u32::try_from(next)
            .map_err(|_| DomainError::validation(format!("quantity {next} is too large")))?;
        self.lines[index].quantity = quantity;
        Ok(Some(quantity))
    }

    /// Drop a line entirely.
    pub fn remove(&mut self, key: &LineKey) -> DomainResult<()> {
        let before = self.lines.len();
        self.lines.retain(|line| line.key() != *key);
        if self.lines.len() == before {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> DomainResult<Decimal> {
        self.lines.iter().try_fold(Decimal::ZERO, |acc, line| {
            acc.checked_add(line.line_total()?)
                .ok_or_else(|| DomainError::validation("cart subtotal overflows"))
        })
    }

    /// Amount due. Equal to the subtotal; there are no shipping or coupon
    /// adjustments.
    pub fn total(&self) -> DomainResult<Decimal> {
        self.subtotal()
    }
}

/// Parse a `GET /cart` payload (`{"items": [...]}`). Lines with quantity 0
/// are dropped.
pub fn parse_cart(payload: &str) -> Result<Cart, ProductParseError> {
    let mut cart: Cart = serde_json::from_str(payload)?;
    cart.lines.retain(|line| line.quantity > 0);
    Ok(cart)
}
