//! Broadcast fan-out
//!
//! Handles the events topic's push subscription: one incoming domain event
//! becomes one broadcast message per enabled, subscribed webhook. This is
//! the only place per-subscriber amplification happens.

use shared::PushMessage;
use sqlx::SqlitePool;

use crate::db::repository::webhook;
use crate::utils::{AppError, AppResult};

use super::publisher::EventPublisher;

/// Fan one events-topic message out to the broadcast topic. Returns how
/// many subscriber copies were published.
pub async fn fan_out(
    pool: &SqlitePool,
    publisher: &EventPublisher,
    message: &PushMessage,
) -> AppResult<usize> {
    let event = message
        .event()
        .ok_or_else(|| AppError::bad_request("message has no event attribute"))?;

    let subscribers = webhook::find_subscribed(pool, event).await?;
    for hook in &subscribers {
        publisher
            .publish_broadcast(event, &hook.id, message.data.clone())
            .await?;
    }
    tracing::debug!(event, subscribers = subscribers.len(), "event fanned out");
    Ok(subscribers.len())
}

#[cfg(test)]
mod tests {
    use crate::db::DbService;
    use crate::db::repository::webhook;

    // Selection logic only; the publish leg is covered by the push
    // endpoint tests.
    #[tokio::test]
    async fn only_enabled_subscribed_webhooks_are_selected() {
        let db = DbService::new_in_memory().await.unwrap();
        webhook::create(
            &db.pool,
            "https://a.example.test/hook",
            "key-a",
            &["order.created".to_string()],
            true,
        )
        .await
        .unwrap();
        webhook::create(
            &db.pool,
            "https://b.example.test/hook",
            "key-b",
            &["payment.recorded".to_string()],
            true,
        )
        .await
        .unwrap();
        webhook::create(
            &db.pool,
            "https://c.example.test/hook",
            "key-c",
            &["order.created".to_string()],
            false,
        )
        .await
        .unwrap();

        let selected = webhook::find_subscribed(&db.pool, "order.created").await.unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].url, "https://a.example.test/hook");

        // service.started is not subscribable, so nothing matches
        let selected = webhook::find_subscribed(&db.pool, "service.started").await.unwrap();
        assert!(selected.is_empty());
    }
}
