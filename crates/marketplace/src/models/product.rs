//! Catalog domain types.

use farm_market_core::Price;

/// A product to be inserted into the catalog.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
}
