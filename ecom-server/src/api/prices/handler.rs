//! Price handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Price, PriceCreate, PriceUpdate};
use shared::{ApiObject, ListResponse};

use crate::core::ServerState;
use crate::db::repository::{price, price_list, product};
use crate::utils::validation::validate_uuid;
use crate::utils::{AppError, AppJson, AppResult};

fn validate_amount(unit_price: i64) -> AppResult<()> {
    if unit_price < 0 {
        return Err(AppError::unprocessable("unit_price must not be negative"));
    }
    Ok(())
}

/// GET /api/prices
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ListResponse<Price>>> {
    let prices = price::find_all(state.pool()).await?;
    Ok(Json(ListResponse::new(prices)))
}

/// GET /api/prices/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiObject<Price>>> {
    validate_uuid(&id, "price id")?;
    let found = price::find_by_id(state.pool(), &id)
        .await?
        .ok_or(shared::ErrorCode::PriceNotFound)?;
    Ok(Json(ApiObject::new("price", found)))
}

/// POST /api/prices
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<PriceCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<Price>>)> {
    validate_uuid(&payload.product_id, "product id")?;
    validate_uuid(&payload.price_list_id, "price list id")?;
    validate_amount(payload.unit_price)?;
    if product::find_by_id(state.pool(), &payload.product_id)
        .await?
        .is_none()
    {
        return Err(shared::ErrorCode::ProductNotFound.into());
    }
    if price_list::find_by_id(state.pool(), &payload.price_list_id)
        .await?
        .is_none()
    {
        return Err(shared::ErrorCode::PriceListNotFound.into());
    }
    let created = price::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("price", created))))
}

/// PUT /api/prices/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<PriceUpdate>,
) -> AppResult<Json<ApiObject<Price>>> {
    validate_uuid(&id, "price id")?;
    if let Some(unit_price) = payload.unit_price {
        validate_amount(unit_price)?;
    }
    let updated = price::update(state.pool(), &id, payload).await?;
    Ok(Json(ApiObject::new("price", updated)))
}

/// DELETE /api/prices/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "price id")?;
    price::delete(state.pool(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
