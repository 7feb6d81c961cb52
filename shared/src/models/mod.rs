//! Data models
//!
//! Wire-level entity models shared between the server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All stable IDs are 36-char lowercase UUIDv4 strings.

pub mod assoc;
pub mod cart;
pub mod category;
pub mod coupon;
pub mod order;
pub mod price;
pub mod product;
pub mod shipping;
pub mod user;
pub mod webhook;

// Re-exports
pub use assoc::*;
pub use cart::*;
pub use category::*;
pub use coupon::*;
pub use order::*;
pub use price::*;
pub use product::*;
pub use shipping::*;
pub use user::*;
pub use webhook::*;
