//! Inventory API module

mod handler;

use axum::{Router, middleware, routing::get, routing::put};

use crate::auth::require_operation;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inventory", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/{product_id}", get(handler::get_by_product))
        .layer(middleware::from_fn(require_operation("inventory:read")));

    let manage_routes = Router::new()
        .route("/", put(handler::batch_set))
        .route("/{product_id}", put(handler::set))
        .layer(middleware::from_fn(require_operation("inventory:manage")));

    read_routes.merge(manage_routes)
}
