//! Offer repository
//!
//! An offer is a live, code-free activation of a promo rule; at most one
//! per rule.

use super::{RepoError, RepoResult, new_id, now};
use shared::ErrorCode;
use shared::models::Offer;
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Offer>> {
    let rows = sqlx::query_as::<_, Offer>(
        "SELECT id, promo_rule_id, created FROM offer ORDER BY created",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Offer>> {
    let row = sqlx::query_as::<_, Offer>(
        "SELECT id, promo_rule_id, created FROM offer WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_rule(pool: &SqlitePool, promo_rule_id: &str) -> RepoResult<Option<Offer>> {
    let row = sqlx::query_as::<_, Offer>(
        "SELECT id, promo_rule_id, created FROM offer WHERE promo_rule_id = ?",
    )
    .bind(promo_rule_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, promo_rule_id: &str) -> RepoResult<Offer> {
    if find_by_rule(pool, promo_rule_id).await?.is_some() {
        return Err(RepoError::Conflict(ErrorCode::OfferExists));
    }
    let id = new_id();
    sqlx::query("INSERT INTO offer (id, promo_rule_id, created) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(promo_rule_id)
        .bind(now())
        .execute(pool)
        .await?;
    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create offer".into()))
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM offer WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::OfferNotFound));
    }
    Ok(())
}
