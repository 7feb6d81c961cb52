//! Pub/sub push endpoints
//!
//! These live outside `/api/` and are not JWT-authenticated; the pub/sub
//! layer authenticates with the shared-secret `?token=` query parameter,
//! compared constant-time.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/pubsub/events", post(handler::events_push))
        .route("/pubsub/broadcast", post(handler::broadcast_push))
}
