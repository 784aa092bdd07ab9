//! Lenient decoding of the storefront API's product payloads.
//!
//! The API is loosely typed: prices arrive as numbers or strings, sizes and
//! colors as comma-separated strings, and fields go missing. A single bad
//! field must never sink the whole listing, so every field decodes through a
//! tolerant shape and is normalized (missing numbers become `0`, missing lists
//! become empty). Only a document that is not a product list at all is an
//! error.

use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde::de::IgnoredAny;
use thiserror::Error;

use storefront_core::ProductId;

use crate::product::{ProductRecord, normalize_labels};

/// Errors raised while decoding a product payload.
#[derive(Debug, Error)]
pub enum ProductParseError {
    #[error("malformed product payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parse a product listing.
///
/// Accepts the envelopes the API uses (`{"allProducts": [...]}` from
/// `GET /products`, `{"products": [...]}` from the category lookup,
/// `{"product": [...]}` from the title lookup) or a bare array. A missing or
/// `null` list yields an empty listing.
pub fn parse_product_list(payload: &str) -> Result<Vec<ProductRecord>, ProductParseError> {
    let envelope: Envelope = serde_json::from_str(payload)?;
    let wire = match envelope {
        Envelope::Bare(items) => items,
        Envelope::Keyed(keyed) => keyed.items.unwrap_or_default(),
    };

    let records: Vec<ProductRecord> = wire.into_iter().map(ProductRecord::from).collect();
    tracing::debug!(count = records.len(), "decoded product payload");
    Ok(records)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope {
    Bare(Vec<WireProduct>),
    Keyed(KeyedEnvelope),
}

#[derive(Debug, Deserialize)]
struct KeyedEnvelope {
    #[serde(rename = "allProducts", alias = "products", alias = "product", default)]
    items: Option<Vec<WireProduct>>,
}

/// A scalar whose JSON type the API does not pin down.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl Scalar {
    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Scalar::Int(n) => Some(Decimal::from(*n)),
            // `Display` for f64 prints the shortest round-tripping form, so
            // 19.99 stays 19.99 instead of its binary expansion.
            Scalar::Float(f) if f.is_finite() => Decimal::from_str(&f.to_string()).ok(),
            Scalar::Float(_) => None,
            Scalar::Text(s) => Decimal::from_str(s.trim()).ok(),
            Scalar::Other(_) => None,
        }
    }

    fn to_text(&self) -> String {
        match self {
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Text(s) => s.clone(),
            Scalar::Other(_) => String::new(),
        }
    }
}

/// A list that may arrive as a JSON array or a comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LabelList {
    Items(Vec<String>),
    Joined(String),
    Other(IgnoredAny),
}

impl LabelList {
    fn into_labels(self) -> Vec<String> {
        match self {
            LabelList::Items(items) => normalize_labels(items),
            LabelList::Joined(joined) => normalize_labels(joined.split(',')),
            LabelList::Other(_) => Vec::new(),
        }
    }
}

/// Product as it appears on the wire, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireProduct {
    #[serde(default)]
    id: Option<Scalar>,
    #[serde(default)]
    title: Option<Scalar>,
    #[serde(default)]
    description: Option<Scalar>,
    #[serde(default)]
    price: Option<Scalar>,
    #[serde(default)]
    discount: Option<Scalar>,
    #[serde(default, alias = "category_name")]
    category: Option<Scalar>,
    #[serde(default)]
    sizes: Option<LabelList>,
    #[serde(default)]
    colors: Option<LabelList>,
    #[serde(default)]
    stock: Option<Scalar>,
    #[serde(default, rename = "image_url", alias = "images")]
    images: Option<LabelList>,
}

impl From<WireProduct> for ProductRecord {
    fn from(wire: WireProduct) -> Self {
        let id = wire
            .id
            .as_ref()
            .and_then(Scalar::to_decimal)
            .and_then(|d| d.trunc().to_u64())
            .map(ProductId::new)
            .unwrap_or_else(|| {
                tracing::warn!("product without a usable id; defaulting to 0");
                ProductId::new(0)
            });

        let price = decode_price(id, wire.price.as_ref());
        let discount = decode_discount(id, wire.discount.as_ref());
        let stock = decode_stock(id, wire.stock.as_ref());

        ProductRecord::from_normalized_parts(
            id,
            text(wire.title.as_ref()),
            text(wire.description.as_ref()),
            price,
            discount,
            text(wire.category.as_ref()).trim().to_string(),
            labels(wire.sizes),
            labels(wire.colors),
            stock,
            labels(wire.images),
        )
    }
}

fn text(value: Option<&Scalar>) -> String {
    value.map(Scalar::to_text).unwrap_or_default()
}

fn labels(value: Option<LabelList>) -> Vec<String> {
    value.map(LabelList::into_labels).unwrap_or_default()
}

fn decode_price(id: ProductId, value: Option<&Scalar>) -> Decimal {
    let Some(price) = value.and_then(Scalar::to_decimal) else {
        if value.is_some() {
            tracing::warn!(product_id = %id, "unparsable price; treating as 0");
        }
        return Decimal::ZERO;
    };

    if price < Decimal::ZERO {
        tracing::warn!(product_id = %id, %price, "negative price clamped to 0");
        return Decimal::ZERO;
    }
    price
}

fn decode_discount(id: ProductId, value: Option<&Scalar>) -> u8 {
    let Some(discount) = value.and_then(Scalar::to_decimal) else {
        return 0;
    };

    let clamped = discount.round().clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    if clamped != discount {
        tracing::warn!(product_id = %id, %discount, %clamped, "discount normalized into 0..=100");
    }
    clamped.to_u8().unwrap_or(0)
}

fn decode_stock(id: ProductId, value: Option<&Scalar>) -> u32 {
    let Some(stock) = value.and_then(Scalar::to_decimal) else {
        return 0;
    };

    if stock < Decimal::ZERO {
        tracing::warn!(product_id = %id, %stock, "negative stock clamped to 0");
        return 0;
    }
    stock.trunc().to_u32().unwrap_or(u32::MAX)
}
