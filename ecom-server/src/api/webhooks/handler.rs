//! Webhook handlers
//!
//! The signing key is generated server-side on create and returned in the
//! response; it is the only time the subscriber needs to store it.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::events::is_subscribable;
use shared::models::{Webhook, WebhookCreate, WebhookUpdate};
use shared::{ApiObject, ErrorCode, ListResponse};

use crate::core::ServerState;
use crate::db::repository::webhook;
use crate::events::generate_signing_key;
use crate::utils::validation::{validate_https_url, validate_uuid};
use crate::utils::{AppError, AppJson, AppResult};

fn validate_events(events: &[String]) -> AppResult<()> {
    if events.is_empty() {
        return Err(AppError::unprocessable("events must not be empty"));
    }
    for event in events {
        if !is_subscribable(event) {
            return Err(AppError::with_message(
                ErrorCode::EventTypeNotFound,
                format!("unknown event type: {event}"),
            ));
        }
    }
    Ok(())
}

/// GET /api/webhooks
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ListResponse<Webhook>>> {
    let webhooks = webhook::find_all(state.pool()).await?;
    Ok(Json(ListResponse::new(webhooks)))
}

/// GET /api/webhooks/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiObject<Webhook>>> {
    validate_uuid(&id, "webhook id")?;
    let found = webhook::find_by_id(state.pool(), &id)
        .await?
        .ok_or(ErrorCode::WebhookNotFound)?;
    Ok(Json(ApiObject::new("webhook", found)))
}

/// POST /api/webhooks
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<WebhookCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<Webhook>>)> {
    validate_https_url(&payload.url)?;
    validate_events(&payload.events)?;
    let signing_key = generate_signing_key()?;
    let created = webhook::create(
        state.pool(),
        &payload.url,
        &signing_key,
        &payload.events,
        payload.enabled.unwrap_or(true),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("webhook", created))))
}

/// PUT /api/webhooks/{id} — the signing key never changes.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<WebhookUpdate>,
) -> AppResult<Json<ApiObject<Webhook>>> {
    validate_uuid(&id, "webhook id")?;
    if let Some(url) = &payload.url {
        validate_https_url(url)?;
    }
    if let Some(events) = &payload.events {
        validate_events(events)?;
    }
    let updated = webhook::update(
        state.pool(),
        &id,
        payload.url.as_deref(),
        payload.events.as_deref(),
        payload.enabled,
    )
    .await?;
    Ok(Json(ApiObject::new("webhook", updated)))
}

/// DELETE /api/webhooks/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "webhook id")?;
    webhook::delete(state.pool(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
