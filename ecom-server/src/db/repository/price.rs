//! Price repository
//!
//! One price per (product, price list) pair.

use super::{RepoError, RepoResult, new_id};
use shared::ErrorCode;
use shared::models::{Price, PriceCreate, PriceUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Price>> {
    let rows = sqlx::query_as::<_, Price>(
        "SELECT id, product_id, price_list_id, unit_price, tax_code FROM price
         ORDER BY price_list_id, product_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Price>> {
    let row = sqlx::query_as::<_, Price>(
        "SELECT id, product_id, price_list_id, unit_price, tax_code FROM price WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_for_product(
    pool: &SqlitePool,
    product_id: &str,
    price_list_id: &str,
) -> RepoResult<Option<Price>> {
    let row = sqlx::query_as::<_, Price>(
        "SELECT id, product_id, price_list_id, unit_price, tax_code FROM price
         WHERE product_id = ? AND price_list_id = ?",
    )
    .bind(product_id)
    .bind(price_list_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_list(pool: &SqlitePool, price_list_id: &str) -> RepoResult<Vec<Price>> {
    let rows = sqlx::query_as::<_, Price>(
        "SELECT id, product_id, price_list_id, unit_price, tax_code FROM price
         WHERE price_list_id = ? ORDER BY product_id",
    )
    .bind(price_list_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: PriceCreate) -> RepoResult<Price> {
    if find_for_product(pool, &data.product_id, &data.price_list_id)
        .await?
        .is_some()
    {
        return Err(RepoError::Conflict(ErrorCode::PriceExists));
    }
    let id = new_id();
    sqlx::query(
        "INSERT INTO price (id, product_id, price_list_id, unit_price, tax_code)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&data.product_id)
    .bind(&data.price_list_id)
    .bind(data.unit_price)
    .bind(data.tax_code.as_deref().unwrap_or("standard"))
    .execute(pool)
    .await?;
    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create price".into()))
}

pub async fn update(pool: &SqlitePool, id: &str, data: PriceUpdate) -> RepoResult<Price> {
    let rows = sqlx::query(
        "UPDATE price SET
            unit_price = COALESCE(?1, unit_price),
            tax_code = COALESCE(?2, tax_code)
         WHERE id = ?3",
    )
    .bind(data.unit_price)
    .bind(&data.tax_code)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::PriceNotFound));
    }
    find_by_id(pool, id)
        .await?
        .ok_or(RepoError::NotFound(ErrorCode::PriceNotFound))
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM price WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::PriceNotFound));
    }
    Ok(())
}
