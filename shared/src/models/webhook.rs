//! Webhook subscription models

use serde::{Deserialize, Serialize};

/// A registered webhook subscriber.
///
/// `signing_key` is 32 random bytes, base58-encoded; outbound deliveries are
/// signed with HMAC-SHA256 over the payload bytes using the decoded key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    /// Absolute https URL.
    pub url: String,
    pub signing_key: String,
    /// Subscribed event names (validated against the closed set).
    pub events: Vec<String>,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookCreate {
    pub url: String,
    pub events: Vec<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookUpdate {
    pub url: Option<String>,
    pub events: Option<Vec<String>>,
    pub enabled: Option<bool>,
}
