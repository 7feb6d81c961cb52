//! Cart API handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Cart, CartCoupon, CartCouponCreate, CartItem, CartItemCreate, CartItemUpdate};
use shared::{ApiObject, ListResponse};

use crate::carts;
use crate::core::ServerState;
use crate::db::repository::cart as cart_repo;
use crate::utils::validation::validate_uuid;
use crate::utils::{AppJson, AppResult};

/// POST /api/carts
pub async fn create(
    State(state): State<ServerState>,
) -> AppResult<(StatusCode, Json<ApiObject<Cart>>)> {
    let created = carts::create_cart(state.pool()).await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("cart", created))))
}

/// GET /api/carts/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiObject<Cart>>> {
    validate_uuid(&id, "cart id")?;
    let found = carts::get_cart(state.pool(), &id).await?;
    Ok(Json(ApiObject::new("cart", found)))
}

/// GET /api/carts/{id}/items
pub async fn list_items(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ListResponse<CartItem>>> {
    validate_uuid(&id, "cart id")?;
    let items = carts::list_items(state.pool(), &id).await?;
    Ok(Json(ListResponse::new(items)))
}

/// POST /api/carts/{id}/items
pub async fn add_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<CartItemCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<CartItem>>)> {
    validate_uuid(&id, "cart id")?;
    validate_uuid(&payload.product_id, "product id")?;
    let item = carts::add_item(state.pool(), &id, &payload.product_id, payload.qty).await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("cart-item", item))))
}

/// PUT /api/carts/{id}/items/{product_id}
pub async fn update_item(
    State(state): State<ServerState>,
    Path((id, product_id)): Path<(String, String)>,
    AppJson(payload): AppJson<CartItemUpdate>,
) -> AppResult<Json<ApiObject<CartItem>>> {
    validate_uuid(&id, "cart id")?;
    validate_uuid(&product_id, "product id")?;
    let item = carts::update_item(state.pool(), &id, &product_id, payload.qty).await?;
    Ok(Json(ApiObject::new("cart-item", item)))
}

/// DELETE /api/carts/{id}/items/{product_id}
pub async fn delete_item(
    State(state): State<ServerState>,
    Path((id, product_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "cart id")?;
    validate_uuid(&product_id, "product id")?;
    carts::delete_item(state.pool(), &id, &product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/carts/{id}/items — empty the cart.
pub async fn empty(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "cart id")?;
    carts::empty(state.pool(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/carts/{id}/coupons
pub async fn list_coupons(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ListResponse<CartCoupon>>> {
    validate_uuid(&id, "cart id")?;
    let coupons = carts::list_coupons(state.pool(), &id).await?;
    Ok(Json(ListResponse::new(coupons)))
}

/// POST /api/carts/{id}/coupons
pub async fn apply_coupon(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<CartCouponCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<CartCoupon>>)> {
    validate_uuid(&id, "cart id")?;
    validate_uuid(&payload.coupon_id, "coupon id")?;
    let applied = carts::apply_coupon(state.pool(), &id, &payload.coupon_id).await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("cart-coupon", applied))))
}

/// DELETE /api/cart-coupons/{id}
pub async fn unapply_coupon(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "cart coupon id")?;
    let attached = cart_repo::find_coupon_by_id(state.pool(), &id)
        .await?
        .ok_or(shared::ErrorCode::CartCouponNotFound)?;
    carts::unapply_coupon(state.pool(), &attached.cart_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
