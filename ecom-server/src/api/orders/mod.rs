//! Order API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_operation;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let place_routes = Router::new()
        .route("/", post(handler::place))
        .layer(middleware::from_fn(require_operation("orders:place")));

    let read_routes = Router::new()
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_operation("orders:read")));

    let list_routes = Router::new()
        .route("/", get(handler::list))
        .layer(middleware::from_fn(require_operation("orders:list")));

    let checkout_routes = Router::new()
        .route("/{id}/checkout", post(handler::checkout))
        .layer(middleware::from_fn(require_operation("orders:checkout")));

    place_routes
        .merge(read_routes)
        .merge(list_routes)
        .merge(checkout_routes)
}
