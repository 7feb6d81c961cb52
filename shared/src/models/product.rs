//! Product models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque structured product content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specification: Option<serde_json::Value>,
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    /// Human SKU, globally unique.
    pub sku: String,
    /// URL-safe path, globally unique.
    pub path: String,
    pub name: String,
    pub data: ProductData,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub sku: String,
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub data: Option<ProductData>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub sku: Option<String>,
    pub path: Option<String>,
    pub name: Option<String>,
    pub data: Option<ProductData>,
}

/// Product snapshot used in catalog listings and association maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductRef {
    pub id: String,
    pub path: String,
    pub sku: String,
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Product image entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductImage {
    pub id: String,
    pub product_id: String,
    pub url: String,
    pub alt: Option<String>,
    pub priority: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImageCreate {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub priority: Option<i64>,
}

/// Product-to-product association group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductGroup {
    pub id: String,
    pub name: String,
    /// Free-form association kind, e.g. "related", "upsell".
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductGroupCreate {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductGroupUpdate {
    pub name: Option<String>,
    pub kind: Option<String>,
}

/// Membership of a product in an association group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductGroupMember {
    pub id: String,
    pub group_id: String,
    pub product_id: String,
    pub priority: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductGroupMemberCreate {
    pub product_id: String,
    #[serde(default)]
    pub priority: Option<i64>,
}
