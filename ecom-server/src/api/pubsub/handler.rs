//! Pub/sub push handlers
//!
//! Response statuses drive redelivery: an ack (2xx) consumes the message,
//! anything else makes the pub/sub layer deliver it again.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ring::constant_time;
use serde::Deserialize;
use serde_json::json;
use shared::{ErrorBody, ErrorCode, PushEnvelope};

use crate::core::ServerState;
use crate::events::{dispatcher, fanout};
use crate::utils::{AppError, AppJson, AppResult};

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    token: Option<String>,
}

fn verify_token(expected: &str, query: &TokenQuery) -> AppResult<()> {
    let supplied = query.token.as_deref().unwrap_or_default();
    constant_time::verify_slices_are_equal(expected.as_bytes(), supplied.as_bytes())
        .map_err(|_| AppError::unauthorized())
}

/// POST /pubsub/events — push subscription of the events topic.
pub async fn events_push(
    State(state): State<ServerState>,
    Query(query): Query<TokenQuery>,
    AppJson(envelope): AppJson<PushEnvelope>,
) -> AppResult<Json<serde_json::Value>> {
    verify_token(&state.config.pubsub.events_token, &query)?;
    let fanned_out = fanout::fan_out(state.pool(), &state.publisher, &envelope.message).await?;
    Ok(Json(json!({ "fanned_out": fanned_out })))
}

/// POST /pubsub/broadcast — push subscription of the broadcast topic.
///
/// A vanished webhook is acknowledged with an error body: retrying cannot
/// help a permanently-gone subscriber. Failed deliveries stay non-2xx so
/// the message comes back.
pub async fn broadcast_push(
    State(state): State<ServerState>,
    Query(query): Query<TokenQuery>,
    AppJson(envelope): AppJson<PushEnvelope>,
) -> AppResult<Response> {
    verify_token(&state.config.pubsub.broadcast_token, &query)?;
    match dispatcher::dispatch(state.pool(), &state.http, &envelope.message).await {
        Ok(()) => Ok(Json(json!({ "delivered": true })).into_response()),
        Err(e) if e.code == ErrorCode::WebhookNotFound => {
            tracing::warn!(message_id = %envelope.message.message_id, "webhook gone, dropping delivery");
            Ok((
                StatusCode::OK,
                Json(ErrorBody::new(e.code, e.message)),
            )
                .into_response())
        }
        Err(e) => Err(e),
    }
}
