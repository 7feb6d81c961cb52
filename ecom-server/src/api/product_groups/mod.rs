//! Product group API module

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_operation;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/product-groups", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/members", get(handler::list_members))
        .layer(middleware::from_fn(require_operation("product-groups:read")));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/members", post(handler::add_member))
        .route("/{id}/members/{product_id}", delete(handler::remove_member))
        .layer(middleware::from_fn(require_operation("product-groups:manage")));

    read_routes.merge(manage_routes)
}
