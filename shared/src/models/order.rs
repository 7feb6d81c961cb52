//! Order models
//!
//! An order is an immutable snapshot produced from a cart at placement time.
//! Addresses are snapshotted into the order, never referenced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A postal address snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Address {
    pub recipient_name: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country_code: String,
}

/// Order entity (self-contained; items are denormalized snapshots).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Human-facing monotonic order number.
    pub order_id: i64,
    pub status: String,
    pub payment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub billing_address: Address,
    pub shipping_address: Address,
    pub currency: String,
    pub total_ex_vat: i64,
    pub vat_total: i64,
    pub total_inc_vat: i64,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

/// Frozen order line: a product snapshot at placement time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub product_path: String,
    pub sku: String,
    pub name: String,
    pub qty: i64,
    pub unit_price: i64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<i64>,
    pub tax_code: String,
    pub vat: i64,
}

/// Order placement request.
///
/// Exactly one of the two shapes must be supplied:
/// - user path: `user_id` + `billing_address_id` + `shipping_address_id`
/// - guest path: `contact_name` + `email` + `billing_address` + `shipping_address`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderCreate {
    pub cart_id: String,
    #[serde(default)]
    pub price_list_id: Option<String>,

    // user path
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub billing_address_id: Option<String>,
    #[serde(default)]
    pub shipping_address_id: Option<String>,

    // guest path
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub billing_address: Option<Address>,
    #[serde(default)]
    pub shipping_address: Option<Address>,
}

/// Response of `POST /api/orders/{id}/checkout`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
