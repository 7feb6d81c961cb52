//! Order API handlers
//!
//! Placement publishes `order.created` strictly after the transaction has
//! committed; a refused publish surfaces to the caller but never rolls the
//! order back.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use shared::events::EVENT_ORDER_CREATED;
use shared::models::{CheckoutSession, Order, OrderCreate};
use shared::{ApiObject, ListResponse};

use crate::auth::{CurrentUser, ensure_owner};
use crate::checkout;
use crate::checkout::payment;
use crate::core::ServerState;
use crate::utils::validation::validate_uuid;
use crate::utils::{AppError, AppJson, AppResult};

/// POST /api/orders
pub async fn place(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    AppJson(payload): AppJson<OrderCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<Order>>)> {
    validate_uuid(&payload.cart_id, "cart id")?;
    // A user-path order can only be placed for the caller's own account.
    if let Some(user_id) = &payload.user_id {
        validate_uuid(user_id, "user id")?;
        ensure_owner(&current, Some(user_id))?;
    }

    let order = checkout::place_order(state.pool(), payload).await?;

    let event_payload = serde_json::to_value(&order)
        .map_err(|e| AppError::internal(format!("failed to encode order event: {e}")))?;
    state
        .publisher
        .publish_topic_event(EVENT_ORDER_CREATED, &event_payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiObject::new("order", order))))
}

/// GET /api/orders
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ListResponse<Order>>> {
    let orders = checkout::list_orders(state.pool()).await?;
    Ok(Json(ListResponse::new(orders)))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiObject<Order>>> {
    validate_uuid(&id, "order id")?;
    let order = checkout::get_order(state.pool(), &id).await?;
    ensure_owner(&current, order.user_id.as_deref())?;
    Ok(Json(ApiObject::new("order", order)))
}

/// POST /api/orders/{id}/checkout — open a hosted payment session.
pub async fn checkout(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<ApiObject<CheckoutSession>>)> {
    validate_uuid(&id, "order id")?;
    let session =
        payment::begin_checkout(state.pool(), &state.http, &state.config.processor, &id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiObject::new("checkout-session", session)),
    ))
}
