//! Product-category relation API module

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::require_operation;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/product-categories", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .layer(middleware::from_fn(require_operation("assocs:read")));

    let manage_routes = Router::new()
        .route("/", post(handler::attach).put(handler::bulk_rewrite))
        .route("/{id}", delete(handler::detach))
        .layer(middleware::from_fn(require_operation("assocs:manage")));

    read_routes.merge(manage_routes)
}
