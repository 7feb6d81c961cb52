//! Product API module

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_operation;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/images", get(handler::list_images))
        .layer(middleware::from_fn(require_operation("products:read")));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/images", post(handler::create_image))
        .route("/{id}/images/{image_id}", delete(handler::delete_image))
        .layer(middleware::from_fn(require_operation("products:manage")));

    read_routes.merge(manage_routes)
}
