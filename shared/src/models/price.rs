//! Price list, price and inventory models
//!
//! All monetary amounts are integer minor units (cents).

use serde::{Deserialize, Serialize};

/// Price list entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PriceList {
    pub id: String,
    /// Unique code, 3-16 chars, case-significant.
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub currency: Option<String>,
    pub strategy: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceListCreate {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub strategy: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceListUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub currency: Option<String>,
    pub strategy: Option<String>,
}

/// Price entity: (product, price list) → unit price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Price {
    pub id: String,
    pub product_id: String,
    pub price_list_id: String,
    /// Integer minor units.
    pub unit_price: i64,
    pub tax_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceCreate {
    pub product_id: String,
    pub price_list_id: String,
    pub unit_price: i64,
    #[serde(default)]
    pub tax_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub unit_price: Option<i64>,
    pub tax_code: Option<String>,
}

/// Per-product stock on hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Inventory {
    pub product_id: String,
    pub onhand: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySet {
    pub onhand: i64,
}

/// One entry of a batch inventory update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryBatchEntry {
    pub product_id: String,
    pub onhand: i64,
}
