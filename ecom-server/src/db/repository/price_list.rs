//! Price list repository

use super::{RepoError, RepoResult, new_id};
use shared::ErrorCode;
use shared::models::{PriceList, PriceListCreate, PriceListUpdate};
use sqlx::SqlitePool;

/// Code of the system-wide default price list.
pub const DEFAULT_CODE: &str = "default";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<PriceList>> {
    let rows = sqlx::query_as::<_, PriceList>(
        "SELECT id, code, name, description, currency, strategy FROM price_list ORDER BY code",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<PriceList>> {
    let row = sqlx::query_as::<_, PriceList>(
        "SELECT id, code, name, description, currency, strategy FROM price_list WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<PriceList>> {
    let row = sqlx::query_as::<_, PriceList>(
        "SELECT id, code, name, description, currency, strategy FROM price_list
         WHERE code = ? LIMIT 1",
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// The system default price list; checkout cannot proceed without it.
pub async fn find_default(pool: &SqlitePool) -> RepoResult<PriceList> {
    find_by_code(pool, DEFAULT_CODE)
        .await?
        .ok_or(RepoError::NotFound(ErrorCode::DefaultPriceListMissing))
}

pub async fn create(pool: &SqlitePool, data: PriceListCreate) -> RepoResult<PriceList> {
    if find_by_code(pool, &data.code).await?.is_some() {
        return Err(RepoError::Conflict(ErrorCode::PriceListCodeExists));
    }
    let id = new_id();
    sqlx::query(
        "INSERT INTO price_list (id, code, name, description, currency, strategy)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&data.code)
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.currency)
    .bind(&data.strategy)
    .execute(pool)
    .await?;
    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create price list".into()))
}

pub async fn update(pool: &SqlitePool, id: &str, data: PriceListUpdate) -> RepoResult<PriceList> {
    // `code` is immutable after creation.
    let rows = sqlx::query(
        "UPDATE price_list SET
            name = COALESCE(?1, name),
            description = COALESCE(?2, description),
            currency = COALESCE(?3, currency),
            strategy = COALESCE(?4, strategy)
         WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.currency)
    .bind(&data.strategy)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::PriceListNotFound));
    }
    find_by_id(pool, id)
        .await?
        .ok_or(RepoError::NotFound(ErrorCode::PriceListNotFound))
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let in_use: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM price WHERE price_list_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if in_use > 0 {
        return Err(RepoError::Conflict(ErrorCode::PriceListInUse));
    }
    let rows = sqlx::query("DELETE FROM price_list WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::PriceListNotFound));
    }
    Ok(())
}
