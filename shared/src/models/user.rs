//! Customer account models
//!
//! Authentication lives in the external identity service; these rows only
//! carry profile data the back office needs (and addresses referenced by
//! the user order path).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Customer/user account entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// A stored user address (referenced by the user order path, then
/// snapshotted into the order).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserAddress {
    pub id: String,
    pub user_id: String,
    pub recipient_name: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAddressCreate {
    pub recipient_name: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country_code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserAddressUpdate {
    pub recipient_name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country_code: Option<String>,
}
