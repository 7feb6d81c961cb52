//! Offer API module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_operation;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/offers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .layer(middleware::from_fn(require_operation("promos:manage")))
}
