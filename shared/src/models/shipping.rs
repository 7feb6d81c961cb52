//! Shipping tariff models

use serde::{Deserialize, Serialize};

/// Shipping tariff entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ShippingTariff {
    pub id: String,
    pub country_code: String,
    /// Globally unique tariff code.
    pub shipping_code: String,
    pub name: String,
    /// Integer minor units.
    pub price: i64,
    pub tax_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingTariffCreate {
    pub country_code: String,
    pub shipping_code: String,
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub tax_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingTariffUpdate {
    pub country_code: Option<String>,
    pub name: Option<String>,
    pub price: Option<i64>,
    pub tax_code: Option<String>,
}
