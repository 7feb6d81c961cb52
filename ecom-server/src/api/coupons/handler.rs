//! Coupon handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Coupon, CouponCreate, CouponUpdate};
use shared::{ApiObject, ListResponse};

use crate::core::ServerState;
use crate::db::repository::{coupon, promo_rule};
use crate::utils::validation::{validate_coupon_code, validate_uuid};
use crate::utils::{AppJson, AppResult};

/// GET /api/coupons
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ListResponse<Coupon>>> {
    let coupons = coupon::find_all(state.pool()).await?;
    Ok(Json(ListResponse::new(coupons)))
}

/// GET /api/coupons/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiObject<Coupon>>> {
    validate_uuid(&id, "coupon id")?;
    let found = coupon::find_by_id(state.pool(), &id)
        .await?
        .ok_or(shared::ErrorCode::CouponNotFound)?;
    Ok(Json(ApiObject::new("coupon", found)))
}

/// POST /api/coupons
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<CouponCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<Coupon>>)> {
    validate_coupon_code(&payload.coupon_code)?;
    validate_uuid(&payload.promo_rule_id, "promo rule id")?;
    if promo_rule::find_by_id(state.pool(), &payload.promo_rule_id)
        .await?
        .is_none()
    {
        return Err(shared::ErrorCode::PromoRuleNotFound.into());
    }
    let created = coupon::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("coupon", created))))
}

/// PUT /api/coupons/{id} — only `void` and `reusable` are mutable.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<CouponUpdate>,
) -> AppResult<Json<ApiObject<Coupon>>> {
    validate_uuid(&id, "coupon id")?;
    let updated = coupon::update(state.pool(), &id, payload).await?;
    Ok(Json(ApiObject::new("coupon", updated)))
}

/// DELETE /api/coupons/{id} — refused while carts reference the coupon.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "coupon id")?;
    coupon::delete(state.pool(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
