//! Offer handlers
//!
//! An offer is the live activation of a promo rule; at most one per rule.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Offer, OfferCreate};
use shared::{ApiObject, ListResponse};

use crate::core::ServerState;
use crate::db::repository::{offer, promo_rule};
use crate::utils::validation::validate_uuid;
use crate::utils::{AppJson, AppResult};

/// GET /api/offers
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ListResponse<Offer>>> {
    let offers = offer::find_all(state.pool()).await?;
    Ok(Json(ListResponse::new(offers)))
}

/// GET /api/offers/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiObject<Offer>>> {
    validate_uuid(&id, "offer id")?;
    let found = offer::find_by_id(state.pool(), &id)
        .await?
        .ok_or(shared::ErrorCode::OfferNotFound)?;
    Ok(Json(ApiObject::new("offer", found)))
}

/// POST /api/offers — activate a promo rule.
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<OfferCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<Offer>>)> {
    validate_uuid(&payload.promo_rule_id, "promo rule id")?;
    if promo_rule::find_by_id(state.pool(), &payload.promo_rule_id)
        .await?
        .is_none()
    {
        return Err(shared::ErrorCode::PromoRuleNotFound.into());
    }
    let created = offer::create(state.pool(), &payload.promo_rule_id).await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("offer", created))))
}

/// DELETE /api/offers/{id} — deactivate.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "offer id")?;
    offer::delete(state.pool(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
