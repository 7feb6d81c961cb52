//! Event types and pub/sub wire shapes
//!
//! Two logical topics exist: "events" (one message per domain event) and
//! "broadcast" (one message per event × subscriber). Both are delivered back
//! into the service as push callbacks carrying the envelope below.
//!
//! Delivery is at-least-once: consumers must deduplicate on `message_id`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Event names a webhook may subscribe to.
///
/// Webhook create/update validates against this set; the broadcast
/// dispatcher cross-checks it again on delivery.
pub const SUBSCRIBABLE_EVENTS: &[&str] = &["order.created", "payment.recorded"];

/// Published on the events topic when the service boots. Not subscribable.
pub const EVENT_SERVICE_STARTED: &str = "service.started";

/// Domain event published after an order placement commits.
pub const EVENT_ORDER_CREATED: &str = "order.created";

/// Domain event published after a payment callback is recorded.
pub const EVENT_PAYMENT_RECORDED: &str = "payment.recorded";

/// True if webhooks may subscribe to `name`.
pub fn is_subscribable(name: &str) -> bool {
    SUBSCRIBABLE_EVENTS.contains(&name)
}

/// Push delivery envelope, as POSTed by the pub/sub system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEnvelope {
    pub message: PushMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
}

/// A single pub/sub message: base64 payload plus string attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    pub message_id: String,
    /// Base64-encoded payload bytes.
    pub data: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl PushMessage {
    /// The `event` attribute, if present.
    pub fn event(&self) -> Option<&str> {
        self.attributes.get("event").map(String::as_str)
    }

    /// The `webhook_id` attribute, if present.
    pub fn webhook_id(&self) -> Option<&str> {
        self.attributes.get("webhook_id").map(String::as_str)
    }
}

/// Outbound webhook POST body.
///
/// `data` is the original domain event payload. The HMAC in
/// `X-Ecom-Hmac-SHA256` is computed over the serialized bytes of this
/// structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub message_id: String,
    pub event: String,
    pub webhook_id: String,
    pub data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_set_is_closed() {
        assert!(is_subscribable("order.created"));
        assert!(!is_subscribable("order.deleted"));
        assert!(!is_subscribable(EVENT_SERVICE_STARTED));
    }

    #[test]
    fn envelope_round_trips() {
        let json = serde_json::json!({
            "message": {
                "message_id": "m1",
                "data": "eyJ4IjoxfQ==",
                "attributes": { "event": "order.created", "webhook_id": "w1" }
            }
        });
        let env: PushEnvelope = serde_json::from_value(json).unwrap();
        assert_eq!(env.message.event(), Some("order.created"));
        assert_eq!(env.message.webhook_id(), Some("w1"));
    }
}
