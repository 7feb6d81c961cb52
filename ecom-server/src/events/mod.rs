//! Event pipeline
//!
//! Domain events flow through two logical pub/sub topics. The publisher
//! puts one message per event on the "events" topic; its push subscription
//! lands at `/pubsub/events`, where the fan-out stage emits one message per
//! (event, subscriber) onto the "broadcast" topic; that topic's push
//! subscription lands at `/pubsub/broadcast`, where the dispatcher signs
//! and POSTs to the webhook URL.
//!
//! Delivery is at-least-once end to end; consumers deduplicate on
//! `message_id`.

pub mod dispatcher;
pub mod fanout;
pub mod publisher;

use ring::rand::{SecureRandom, SystemRandom};

use crate::utils::{AppError, AppResult};

/// Push delivery statuses treated as acknowledged; anything else causes
/// pub/sub redelivery.
pub const ACK_STATUSES: &[u16] = &[102, 200, 201, 202, 204];

pub fn is_ack_status(status: u16) -> bool {
    ACK_STATUSES.contains(&status)
}

/// Fresh webhook signing key: 32 random bytes, base58-encoded.
pub fn generate_signing_key() -> AppResult<String> {
    let rng = SystemRandom::new();
    let mut key = [0u8; 32];
    rng.fill(&mut key)
        .map_err(|_| AppError::internal("failed to generate signing key"))?;
    Ok(bs58::encode(key).into_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_statuses_match_the_push_contract() {
        for status in [102, 200, 201, 202, 204] {
            assert!(is_ack_status(status));
        }
        for status in [301, 400, 404, 500, 502] {
            assert!(!is_ack_status(status));
        }
    }

    #[test]
    fn signing_keys_decode_to_32_bytes() {
        let key = generate_signing_key().unwrap();
        let bytes = bs58::decode(&key).into_vec().unwrap();
        assert_eq!(bytes.len(), 32);
        // two keys never collide
        assert_ne!(key, generate_signing_key().unwrap());
    }
}
