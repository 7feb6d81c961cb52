//! Webhook repository
//!
//! `events` is stored as a JSON array of event names.

use super::{RepoError, RepoResult, new_id};
use shared::ErrorCode;
use shared::models::Webhook;
use sqlx::SqlitePool;

#[derive(sqlx::FromRow)]
struct WebhookRow {
    id: String,
    url: String,
    signing_key: String,
    events: String,
    enabled: bool,
}

impl WebhookRow {
    fn decode(self) -> RepoResult<Webhook> {
        let events: Vec<String> = serde_json::from_str(&self.events)
            .map_err(|e| RepoError::Database(format!("Corrupt webhook events: {e}")))?;
        Ok(Webhook {
            id: self.id,
            url: self.url,
            signing_key: self.signing_key,
            events,
            enabled: self.enabled,
        })
    }
}

const COLUMNS: &str = "id, url, signing_key, events, enabled";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Webhook>> {
    let rows = sqlx::query_as::<_, WebhookRow>(&format!(
        "SELECT {COLUMNS} FROM webhook ORDER BY url"
    ))
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(WebhookRow::decode).collect()
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Webhook>> {
    let row = sqlx::query_as::<_, WebhookRow>(&format!(
        "SELECT {COLUMNS} FROM webhook WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(WebhookRow::decode).transpose()
}

pub async fn find_by_url(pool: &SqlitePool, url: &str) -> RepoResult<Option<Webhook>> {
    let row = sqlx::query_as::<_, WebhookRow>(&format!(
        "SELECT {COLUMNS} FROM webhook WHERE url = ? LIMIT 1"
    ))
    .bind(url)
    .fetch_optional(pool)
    .await?;
    row.map(WebhookRow::decode).transpose()
}

/// Enabled webhooks subscribed to `event`.
pub async fn find_subscribed(pool: &SqlitePool, event: &str) -> RepoResult<Vec<Webhook>> {
    let all = sqlx::query_as::<_, WebhookRow>(&format!(
        "SELECT {COLUMNS} FROM webhook WHERE enabled = 1"
    ))
    .fetch_all(pool)
    .await?;
    let mut subscribed = Vec::new();
    for row in all {
        let hook = row.decode()?;
        if hook.events.iter().any(|e| e == event) {
            subscribed.push(hook);
        }
    }
    Ok(subscribed)
}

pub async fn create(
    pool: &SqlitePool,
    url: &str,
    signing_key: &str,
    events: &[String],
    enabled: bool,
) -> RepoResult<Webhook> {
    if find_by_url(pool, url).await?.is_some() {
        return Err(RepoError::Conflict(ErrorCode::WebhookExists));
    }
    let id = new_id();
    let events_json = serde_json::to_string(events)
        .map_err(|e| RepoError::Database(format!("Failed to encode events: {e}")))?;
    sqlx::query(
        "INSERT INTO webhook (id, url, signing_key, events, enabled) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(url)
    .bind(signing_key)
    .bind(&events_json)
    .bind(enabled)
    .execute(pool)
    .await?;
    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create webhook".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: &str,
    url: Option<&str>,
    events: Option<&[String]>,
    enabled: Option<bool>,
) -> RepoResult<Webhook> {
    if let Some(url) = url
        && let Some(other) = find_by_url(pool, url).await?
        && other.id != id
    {
        return Err(RepoError::Conflict(ErrorCode::WebhookExists));
    }
    let events_json = match events {
        Some(events) => Some(
            serde_json::to_string(events)
                .map_err(|e| RepoError::Database(format!("Failed to encode events: {e}")))?,
        ),
        None => None,
    };
    let rows = sqlx::query(
        "UPDATE webhook SET
            url = COALESCE(?1, url),
            events = COALESCE(?2, events),
            enabled = COALESCE(?3, enabled)
         WHERE id = ?4",
    )
    .bind(url)
    .bind(&events_json)
    .bind(enabled)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::WebhookNotFound));
    }
    find_by_id(pool, id)
        .await?
        .ok_or(RepoError::NotFound(ErrorCode::WebhookNotFound))
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM webhook WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::WebhookNotFound));
    }
    Ok(())
}
