//! Products domain module (read-only catalog records).
//!
//! Products are owned by the remote storefront API; this crate models the
//! records it returns, parses its JSON payloads leniently and answers simple
//! lookups (by id, related items). Cart arithmetic lives here too. No IO
//! happens here.

pub mod cart;
pub mod product;
pub mod related;
pub mod wire;

pub use cart::{Cart, CartLine, LineKey, parse_cart};
pub use product::{ProductRecord, normalize_labels, same_label};
pub use related::{find_by_id, find_by_title, related_products};
pub use wire::{ProductParseError, parse_product_list};
