//! Inventory handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Inventory, InventoryBatchEntry, InventorySet};
use shared::ApiObject;

use crate::core::ServerState;
use crate::db::repository::{inventory, product};
use crate::utils::validation::validate_uuid;
use crate::utils::{AppError, AppJson, AppResult};

fn validate_onhand(onhand: i64) -> AppResult<()> {
    if onhand < 0 {
        return Err(AppError::unprocessable("onhand must not be negative"));
    }
    Ok(())
}

/// GET /api/inventory/{product_id}
pub async fn get_by_product(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiObject<Inventory>>> {
    validate_uuid(&product_id, "product id")?;
    let found = inventory::find_by_product(state.pool(), &product_id)
        .await?
        .ok_or(shared::ErrorCode::InventoryNotFound)?;
    Ok(Json(ApiObject::new("inventory", found)))
}

/// PUT /api/inventory/{product_id}
pub async fn set(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
    AppJson(payload): AppJson<InventorySet>,
) -> AppResult<Json<ApiObject<Inventory>>> {
    validate_uuid(&product_id, "product id")?;
    validate_onhand(payload.onhand)?;
    if product::find_by_id(state.pool(), &product_id).await?.is_none() {
        return Err(shared::ErrorCode::ProductNotFound.into());
    }
    let updated = inventory::set(state.pool(), &product_id, payload.onhand).await?;
    Ok(Json(ApiObject::new("inventory", updated)))
}

/// PUT /api/inventory — all-or-nothing batch set.
pub async fn batch_set(
    State(state): State<ServerState>,
    AppJson(entries): AppJson<Vec<InventoryBatchEntry>>,
) -> AppResult<StatusCode> {
    for entry in &entries {
        validate_uuid(&entry.product_id, "product id")?;
        validate_onhand(entry.onhand)?;
    }
    inventory::batch_set(state.pool(), &entries).await?;
    Ok(StatusCode::OK)
}
