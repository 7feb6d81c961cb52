//! Cart models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cart entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Cart {
    pub id: String,
    pub created: DateTime<Utc>,
}

/// Cart line item. `unit_price` is frozen at add-time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: String,
    pub cart_id: String,
    pub product_id: String,
    pub qty: i64,
    pub unit_price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemCreate {
    pub product_id: String,
    pub qty: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemUpdate {
    pub qty: i64,
}

/// A coupon attached to a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartCoupon {
    pub id: String,
    pub cart_id: String,
    pub coupon_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartCouponCreate {
    pub coupon_id: String,
}
