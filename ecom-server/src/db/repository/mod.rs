//! Repository Module
//!
//! CRUD over the SQLite tables, one module per aggregate. Everything is a
//! free function over a pool or transaction; services own the transaction
//! boundaries.

// Accounts
pub mod user;

// Catalog
pub mod category_tree;
pub mod product;
pub mod product_category;
pub mod product_group;
pub mod product_image;

// Pricing
pub mod inventory;
pub mod price;
pub mod price_list;

// Carts and promotions
pub mod cart;
pub mod coupon;
pub mod offer;
pub mod promo_rule;

// Checkout
pub mod order;
pub mod payment;
pub mod shipping_tariff;

// Integrations
pub mod webhook;

use chrono::{DateTime, Utc};
use shared::ErrorCode;
use thiserror::Error;
use uuid::Uuid;

/// Repository error types
///
/// Named failures carry the wire-level [`ErrorCode`] directly so handlers
/// translate without re-matching.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0}")]
    NotFound(ErrorCode),

    #[error("{0}")]
    Conflict(ErrorCode),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Fresh lowercase UUIDv4 entity id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current timestamp for created/modified columns.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
