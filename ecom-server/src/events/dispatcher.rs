//! Webhook dispatcher
//!
//! Handles the broadcast topic's push subscription: decode the payload,
//! sign it with the webhook's key, POST it. Non-acknowledged responses
//! surface as `WebhookPostFailed` so the pub/sub layer redelivers.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use shared::{ErrorCode, PushMessage, WebhookPayload, events};
use sqlx::SqlitePool;
use std::time::Duration;

use crate::db::repository::webhook;
use crate::utils::{AppError, AppResult};

use super::is_ack_status;

/// Outbound signature header.
pub const SIGNATURE_HEADER: &str = "X-Ecom-Hmac-SHA256";

/// Outbound POST timeout. Expiry counts as a failed delivery.
const POST_TIMEOUT: Duration = Duration::from_secs(5);

/// Base64 HMAC-SHA256 of `payload` under a base58-encoded signing key.
pub fn sign(signing_key: &str, payload: &[u8]) -> AppResult<String> {
    let key = bs58::decode(signing_key)
        .into_vec()
        .map_err(|_| AppError::internal("webhook signing key is not valid base58"))?;
    let mut mac = Hmac::<Sha256>::new_from_slice(&key)
        .map_err(|_| AppError::internal("webhook signing key rejected by HMAC"))?;
    mac.update(payload);
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Deliver one broadcast message to its webhook.
pub async fn dispatch(
    pool: &SqlitePool,
    client: &reqwest::Client,
    message: &PushMessage,
) -> AppResult<()> {
    let event = message
        .event()
        .ok_or_else(|| AppError::bad_request("message has no event attribute"))?;
    if !events::is_subscribable(event) {
        return Err(ErrorCode::EventTypeNotFound.into());
    }
    let webhook_id = message
        .webhook_id()
        .ok_or_else(|| AppError::bad_request("message has no webhook_id attribute"))?;
    let hook = webhook::find_by_id(pool, webhook_id)
        .await?
        .ok_or(ErrorCode::WebhookNotFound)?;

    let raw = BASE64
        .decode(&message.data)
        .map_err(|_| AppError::bad_request("message data is not valid base64"))?;
    let data: serde_json::Value = serde_json::from_slice(&raw)
        .map_err(|_| AppError::bad_request("message data is not valid JSON"))?;

    let payload = WebhookPayload {
        message_id: message.message_id.clone(),
        event: event.to_string(),
        webhook_id: webhook_id.to_string(),
        data,
    };
    let body = serde_json::to_vec(&payload)
        .map_err(|e| AppError::internal(format!("failed to encode webhook payload: {e}")))?;
    let signature = sign(&hook.signing_key, &body)?;

    let response = client
        .post(&hook.url)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(SIGNATURE_HEADER, signature)
        .body(body)
        .timeout(POST_TIMEOUT)
        .send()
        .await
        .map_err(|e| {
            AppError::with_message(
                ErrorCode::WebhookPostFailed,
                format!("webhook POST failed: {e}"),
            )
        })?;

    let status = response.status().as_u16();
    if !is_ack_status(status) {
        return Err(AppError::with_message(
            ErrorCode::WebhookPostFailed,
            format!("webhook answered status {status}"),
        ));
    }
    tracing::debug!(webhook = webhook_id, event, message_id = %message.message_id, "webhook delivered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn signature_is_base64_hmac_over_payload_bytes() {
        let key = super::super::generate_signing_key().unwrap();
        let payload = WebhookPayload {
            message_id: "m1".into(),
            event: "order.created".into(),
            webhook_id: "w1".into(),
            data: serde_json::json!({"order_id": 7}),
        };
        let body = serde_json::to_vec(&payload).unwrap();
        let signature = sign(&key, &body).unwrap();

        // verify independently
        let key_bytes = bs58::decode(&key).into_vec().unwrap();
        let mut mac = Hmac::<Sha256>::new_from_slice(&key_bytes).unwrap();
        mac.update(&body);
        assert_eq!(signature, BASE64.encode(mac.finalize().into_bytes()));

        // a different payload yields a different signature
        let other = sign(&key, b"{}").unwrap();
        assert_ne!(signature, other);
    }

    #[tokio::test]
    async fn unknown_event_and_missing_webhook_are_named_failures() {
        let db = crate::db::DbService::new_in_memory().await.unwrap();
        let client = reqwest::Client::new();

        let mut message = PushMessage {
            message_id: "m1".into(),
            data: BASE64.encode(b"{}"),
            attributes: HashMap::from([("event".to_string(), "order.deleted".to_string())]),
        };
        let err = dispatch(&db.pool, &client, &message).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EventTypeNotFound);

        message
            .attributes
            .insert("event".to_string(), "order.created".to_string());
        message
            .attributes
            .insert("webhook_id".to_string(), "no-such-webhook".to_string());
        let err = dispatch(&db.pool, &client, &message).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::WebhookNotFound);
    }
}
