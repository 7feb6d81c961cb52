//! Shipping tariff handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{ShippingTariff, ShippingTariffCreate, ShippingTariffUpdate};
use shared::{ApiObject, ListResponse};

use crate::core::ServerState;
use crate::db::repository::shipping_tariff;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_country_code, validate_required_text,
    validate_uuid,
};
use crate::utils::{AppError, AppJson, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    country: Option<String>,
}

/// GET /api/shipping-tariffs?country=XX
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ListResponse<ShippingTariff>>> {
    let tariffs = match query.country {
        Some(country) => {
            validate_country_code(&country)?;
            shipping_tariff::find_by_country(state.pool(), &country).await?
        }
        None => shipping_tariff::find_all(state.pool()).await?,
    };
    Ok(Json(ListResponse::new(tariffs)))
}

/// GET /api/shipping-tariffs/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiObject<ShippingTariff>>> {
    validate_uuid(&id, "tariff id")?;
    let found = shipping_tariff::find_by_id(state.pool(), &id)
        .await?
        .ok_or(shared::ErrorCode::ShippingTariffNotFound)?;
    Ok(Json(ApiObject::new("shipping-tariff", found)))
}

/// POST /api/shipping-tariffs
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<ShippingTariffCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<ShippingTariff>>)> {
    validate_country_code(&payload.country_code)?;
    validate_required_text(&payload.shipping_code, "shipping_code", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    if payload.price < 0 {
        return Err(AppError::unprocessable("price must not be negative"));
    }
    let created = shipping_tariff::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("shipping-tariff", created))))
}

/// PUT /api/shipping-tariffs/{id} — `shipping_code` is immutable.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ShippingTariffUpdate>,
) -> AppResult<Json<ApiObject<ShippingTariff>>> {
    validate_uuid(&id, "tariff id")?;
    if let Some(country_code) = &payload.country_code {
        validate_country_code(country_code)?;
    }
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(price) = payload.price
        && price < 0
    {
        return Err(AppError::unprocessable("price must not be negative"));
    }
    let updated = shipping_tariff::update(state.pool(), &id, payload).await?;
    Ok(Json(ApiObject::new("shipping-tariff", updated)))
}

/// DELETE /api/shipping-tariffs/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "tariff id")?;
    shipping_tariff::delete(state.pool(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
