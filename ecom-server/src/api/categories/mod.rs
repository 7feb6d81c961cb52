//! Category (catalog tree) API module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_operation;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::get_tree))
        .route("/{id}", get(handler::get_by_id))
        .route("/path/{*path}", get(handler::get_by_path))
        .layer(middleware::from_fn(require_operation("catalog:read")));

    let write_routes = Router::new()
        .route(
            "/",
            axum::routing::put(handler::replace_tree).delete(handler::purge),
        )
        .layer(middleware::from_fn(require_operation("catalog:write")));

    read_routes.merge(write_routes)
}
