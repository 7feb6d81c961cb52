//! Payment callback handler

use axum::{Json, extract::State, http::StatusCode};
use serde_json::Value;
use shared::events::EVENT_PAYMENT_RECORDED;

use crate::checkout::payment;
use crate::core::ServerState;
use crate::utils::{AppJson, AppResult};

/// POST /api/payments/callback
///
/// Records the completed checkout session and announces `payment.recorded`.
/// A non-2xx response makes the processor redeliver, which is safe because
/// recording is idempotent.
pub async fn callback(
    State(state): State<ServerState>,
    AppJson(body): AppJson<Value>,
) -> AppResult<(StatusCode, Json<Value>)> {
    payment::process_callback(state.pool(), &body).await?;
    state
        .publisher
        .publish_topic_event(EVENT_PAYMENT_RECORDED, &body)
        .await?;
    Ok((StatusCode::OK, Json(serde_json::json!({"received": true}))))
}
