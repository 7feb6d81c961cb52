//! Event publisher
//!
//! Publishes domain events onto the two logical topics. Topics are backed
//! by push endpoints: publishing posts a pub/sub envelope to the topic's
//! push URL with the shared-secret token, and the message id is assigned
//! here. Publish failures surface to the caller; committed state is never
//! rolled back because of them.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;
use shared::{PushEnvelope, PushMessage};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

use crate::core::config::PubSubConfig;
use crate::utils::{AppError, AppResult};

use super::is_ack_status;

/// Shared topic publisher; cheap to clone, safe for concurrent publish.
#[derive(Clone)]
pub struct EventPublisher {
    client: reqwest::Client,
    config: PubSubConfig,
}

impl EventPublisher {
    pub fn new(config: PubSubConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Publish one domain event onto the events topic. Returns the
    /// server-assigned message id.
    pub async fn publish_topic_event(&self, event: &str, payload: &Value) -> AppResult<String> {
        let bytes = serde_json::to_vec(payload)
            .map_err(|e| AppError::internal(format!("failed to encode event payload: {e}")))?;
        let message = PushMessage {
            message_id: Uuid::new_v4().to_string(),
            data: BASE64.encode(bytes),
            attributes: HashMap::from([("event".to_string(), event.to_string())]),
        };
        let message_id = message.message_id.clone();
        self.push(&self.config.events_push_url, &self.config.events_token, message)
            .await?;
        tracing::debug!(event, message_id = %message_id, "event published");
        Ok(message_id)
    }

    /// Publish one per-subscriber copy onto the broadcast topic. A fresh
    /// message id is assigned; the payload bytes are untouched.
    pub async fn publish_broadcast(&self, event: &str, webhook_id: &str, data: String) -> AppResult<String> {
        let message = PushMessage {
            message_id: Uuid::new_v4().to_string(),
            data,
            attributes: HashMap::from([
                ("event".to_string(), event.to_string()),
                ("webhook_id".to_string(), webhook_id.to_string()),
            ]),
        };
        let message_id = message.message_id.clone();
        self.push(
            &self.config.broadcast_push_url,
            &self.config.broadcast_token,
            message,
        )
        .await?;
        Ok(message_id)
    }

    async fn push(&self, url: &str, token: &str, message: PushMessage) -> AppResult<()> {
        let envelope = PushEnvelope {
            message,
            subscription: None,
        };
        let response = self
            .client
            .post(url)
            .query(&[("token", token)])
            .json(&envelope)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| AppError::internal(format!("topic publish failed: {e}")))?;
        let status = response.status().as_u16();
        if !is_ack_status(status) {
            return Err(AppError::internal(format!(
                "topic publish not acknowledged (status {status})"
            )));
        }
        Ok(())
    }
}
