//! Cart API module
//!
//! Guest-accessible: cart ids are unguessable UUIDs and act as capability
//! tokens, so the whole surface runs under the `carts:use` operation.

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_operation;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/carts", cart_routes())
        .nest("/api/cart-coupons", coupon_routes())
}

fn cart_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route(
            "/{id}/items",
            get(handler::list_items)
                .post(handler::add_item)
                .delete(handler::empty),
        )
        .route(
            "/{id}/items/{product_id}",
            put(handler::update_item).delete(handler::delete_item),
        )
        .route(
            "/{id}/coupons",
            get(handler::list_coupons).post(handler::apply_coupon),
        )
        .layer(middleware::from_fn(require_operation("carts:use")))
}

fn coupon_routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", delete(handler::unapply_coupon))
        .layer(middleware::from_fn(require_operation("carts:use")))
}
