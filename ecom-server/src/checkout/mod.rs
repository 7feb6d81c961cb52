//! Checkout domain
//!
//! Order placement (cart → immutable order) and the payment-intent bridge
//! to the external card processor.

pub mod order;
pub mod payment;

pub use order::{get_order, list_orders, place_order};
