//! Payment repository
//!
//! Raw processor callbacks, stored verbatim. The (order, payment intent)
//! pair is unique so redelivered callbacks are recorded once.

use super::{RepoResult, new_id, now};
use sqlx::{Sqlite, Transaction};

/// Record a callback. Returns false when this (order, intent) pair was
/// already recorded, which makes redelivery a no-op for the caller.
pub async fn record(
    tx: &mut Transaction<'_, Sqlite>,
    order_uuid: &str,
    payment_intent_id: &str,
    body: &str,
) -> RepoResult<bool> {
    let result = sqlx::query(
        "INSERT INTO payment (id, order_uuid, payment_intent_id, body, created)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(order_uuid, payment_intent_id) DO NOTHING",
    )
    .bind(new_id())
    .bind(order_uuid)
    .bind(payment_intent_id)
    .bind(body)
    .bind(now())
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() > 0)
}
