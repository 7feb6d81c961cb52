//! Price list handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{PriceList, PriceListCreate, PriceListUpdate};
use shared::{ApiObject, ListResponse};

use crate::core::ServerState;
use crate::db::repository::price_list;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text, validate_uuid,
};
use crate::utils::{AppError, AppJson, AppResult};

fn validate_code(code: &str) -> AppResult<()> {
    if code.len() < 3 || code.len() > 16 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::unprocessable(
            "code must be 3-16 alphanumeric characters",
        ));
    }
    Ok(())
}

/// GET /api/price-lists
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ListResponse<PriceList>>> {
    let lists = price_list::find_all(state.pool()).await?;
    Ok(Json(ListResponse::new(lists)))
}

/// GET /api/price-lists/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiObject<PriceList>>> {
    validate_uuid(&id, "price list id")?;
    let found = price_list::find_by_id(state.pool(), &id)
        .await?
        .ok_or(shared::ErrorCode::PriceListNotFound)?;
    Ok(Json(ApiObject::new("price-list", found)))
}

/// POST /api/price-lists
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<PriceListCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<PriceList>>)> {
    validate_code(&payload.code)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.strategy, "strategy", MAX_SHORT_TEXT_LEN)?;
    let created = price_list::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("price-list", created))))
}

/// PUT /api/price-lists/{id} — `code` is immutable.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<PriceListUpdate>,
) -> AppResult<Json<ApiObject<PriceList>>> {
    validate_uuid(&id, "price list id")?;
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    let updated = price_list::update(state.pool(), &id, payload).await?;
    Ok(Json(ApiObject::new("price-list", updated)))
}

/// DELETE /api/price-lists/{id} — refused while prices reference the list.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "price list id")?;
    price_list::delete(state.pool(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
