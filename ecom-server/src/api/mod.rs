//! API routing
//!
//! One module per resource, each exposing `router()`; [`create_router`]
//! merges them and applies the cross-cutting layers (identity resolution,
//! CORS, access logging).

pub mod carts;
pub mod categories;
pub mod coupons;
pub mod health;
pub mod inventory;
pub mod offers;
pub mod orders;
pub mod payments;
pub mod price_lists;
pub mod prices;
pub mod product_categories;
pub mod product_groups;
pub mod products;
pub mod promo_rules;
pub mod pubsub;
pub mod shipping_tariffs;
pub mod users;
pub mod webhooks;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    tracing::info!(target: "http_access", "{} {} {}", method, uri, response.status());
    response
}

pub fn create_router(state: ServerState) -> Router {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(users::router())
        .merge(products::router())
        .merge(categories::router())
        .merge(product_categories::router())
        .merge(product_groups::router())
        .merge(price_lists::router())
        .merge(prices::router())
        .merge(inventory::router())
        .merge(carts::router())
        .merge(promo_rules::router())
        .merge(offers::router())
        .merge(coupons::router())
        .merge(shipping_tariffs::router())
        .merge(orders::router())
        .merge(payments::router())
        .merge(webhooks::router())
        .merge(pubsub::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(log_request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::auth::Role;

    async fn body_json(response: http::Response<Body>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let state = ServerState::for_tests().await;
        let app = create_router(state);
        let response = app
            .oneshot(
                Request::get("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn anonymous_callers_can_shop_but_not_manage() {
        let state = ServerState::for_tests().await;
        let app = create_router(state);

        // guest cart creation works without a token
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/carts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["object"], "cart");

        // back office surface is closed
        let response = app
            .oneshot(
                Request::get("/api/webhooks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_token_opens_the_back_office() {
        let state = ServerState::for_tests().await;
        let token = state
            .jwt_service
            .generate_token("admin-1", Role::Admin)
            .unwrap();
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::get("/api/webhooks")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["object"], "list");
    }

    #[tokio::test]
    async fn customer_tokens_do_not_open_management_routes() {
        let state = ServerState::for_tests().await;
        let token = state
            .jwt_service
            .generate_token("cust-1", Role::Customer)
            .unwrap();
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::get("/api/webhooks")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn push_endpoints_require_the_shared_token() {
        let state = ServerState::for_tests().await;
        let good_token = state.config.pubsub.events_token.clone();
        let app = create_router(state);

        let envelope = serde_json::json!({
            "message": {
                "message_id": "m1",
                "data": "e30=",
                "attributes": { "event": "order.created" }
            }
        });

        let response = app
            .clone()
            .oneshot(
                Request::post("/pubsub/events?token=wrong")
                    .header("content-type", "application/json")
                    .body(Body::from(envelope.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // correct token: no subscribers yet, still an ack
        let response = app
            .oneshot(
                Request::post(format!("/pubsub/events?token={good_token}"))
                    .header("content-type", "application/json")
                    .body(Body::from(envelope.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["fanned_out"], 0);
    }
}
