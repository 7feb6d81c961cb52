//! Promo rule handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{PromoKind, PromoRule, PromoRuleCreate, PromoRuleUpdate};
use shared::{ApiObject, ListResponse};

use crate::core::ServerState;
use crate::db::repository::promo_rule;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text, validate_uuid};
use crate::utils::{AppError, AppJson, AppResult};

fn validate_amount(kind: PromoKind, amount: i64) -> AppResult<()> {
    match kind {
        PromoKind::Percentage if !(1..=100).contains(&amount) => Err(AppError::unprocessable(
            "percentage amount must be between 1 and 100",
        )),
        PromoKind::Fixed if amount < 1 => {
            Err(AppError::unprocessable("fixed amount must be positive"))
        }
        _ => Ok(()),
    }
}

/// GET /api/promo-rules
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ListResponse<PromoRule>>> {
    let rules = promo_rule::find_all(state.pool()).await?;
    Ok(Json(ListResponse::new(rules)))
}

/// GET /api/promo-rules/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiObject<PromoRule>>> {
    validate_uuid(&id, "promo rule id")?;
    let found = promo_rule::find_by_id(state.pool(), &id)
        .await?
        .ok_or(shared::ErrorCode::PromoRuleNotFound)?;
    Ok(Json(ApiObject::new("promo-rule", found)))
}

/// POST /api/promo-rules
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<PromoRuleCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<PromoRule>>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_amount(payload.kind, payload.amount)?;
    if let (Some(starts_at), Some(ends_at)) = (payload.starts_at, payload.ends_at)
        && ends_at <= starts_at
    {
        return Err(AppError::unprocessable("ends_at must be after starts_at"));
    }
    let created = promo_rule::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("promo-rule", created))))
}

/// PUT /api/promo-rules/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<PromoRuleUpdate>,
) -> AppResult<Json<ApiObject<PromoRule>>> {
    validate_uuid(&id, "promo rule id")?;
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let (Some(kind), Some(amount)) = (payload.kind, payload.amount) {
        validate_amount(kind, amount)?;
    }
    let updated = promo_rule::update(state.pool(), &id, payload).await?;
    Ok(Json(ApiObject::new("promo-rule", updated)))
}

/// DELETE /api/promo-rules/{id} — refused while coupons or offers reference
/// the rule.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "promo rule id")?;
    promo_rule::delete(state.pool(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
