//! Payment callback API module
//!
//! The processor calls back without a bearer token; the callback is public
//! and idempotent per (order, payment intent).

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/payments/callback", post(handler::callback))
}
