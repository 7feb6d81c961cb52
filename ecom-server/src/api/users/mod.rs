//! User API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_operation;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    // Reads are ownership-gated in the handlers so customers only ever see
    // their own account and addresses.
    let own_routes = Router::new()
        .route("/{id}", get(handler::get_by_id))
        .route(
            "/{id}/addresses",
            get(handler::list_addresses).post(handler::create_address),
        )
        .route(
            "/{id}/addresses/{address_id}",
            put(handler::update_address).delete(handler::delete_address),
        )
        .layer(middleware::from_fn(require_operation("users:read")));

    let manage_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_operation("users:manage")));

    own_routes.merge(manage_routes)
}
