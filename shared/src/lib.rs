//! Shared wire types for the ecom back office API
//!
//! Common types used by the server and by API clients: entity models,
//! request/response envelopes, the error-code taxonomy, pub/sub envelopes
//! and the closed set of webhook event types.

pub mod error;
pub mod events;
pub mod models;
pub mod response;

// Re-exports
pub use error::{ErrorBody, ErrorCode};
pub use events::{PushEnvelope, PushMessage, WebhookPayload};
pub use response::{ApiObject, ListResponse};
pub use serde::{Deserialize, Serialize};
