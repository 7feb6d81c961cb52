//! Coupon repository

use super::{RepoError, RepoResult, new_id};
use shared::ErrorCode;
use shared::models::{Coupon, CouponCreate, CouponUpdate};
use sqlx::{Sqlite, SqlitePool, Transaction};

const COLUMNS: &str = "id, coupon_code, promo_rule_id, void, reusable, spend_count";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Coupon>> {
    let rows = sqlx::query_as::<_, Coupon>(&format!(
        "SELECT {COLUMNS} FROM coupon ORDER BY coupon_code"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Coupon>> {
    let row = sqlx::query_as::<_, Coupon>(&format!("SELECT {COLUMNS} FROM coupon WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Read inside the order placement transaction.
pub async fn find_by_id_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: &str,
) -> RepoResult<Option<Coupon>> {
    let row = sqlx::query_as::<_, Coupon>(&format!("SELECT {COLUMNS} FROM coupon WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row)
}

pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<Coupon>> {
    let row = sqlx::query_as::<_, Coupon>(&format!(
        "SELECT {COLUMNS} FROM coupon WHERE coupon_code = ? LIMIT 1"
    ))
    .bind(code)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: CouponCreate) -> RepoResult<Coupon> {
    if find_by_code(pool, &data.coupon_code).await?.is_some() {
        return Err(RepoError::Conflict(ErrorCode::CouponExists));
    }
    let id = new_id();
    sqlx::query(
        "INSERT INTO coupon (id, coupon_code, promo_rule_id, reusable) VALUES (?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&data.coupon_code)
    .bind(&data.promo_rule_id)
    .bind(data.reusable.unwrap_or(false))
    .execute(pool)
    .await?;
    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create coupon".into()))
}

pub async fn update(pool: &SqlitePool, id: &str, data: CouponUpdate) -> RepoResult<Coupon> {
    let rows = sqlx::query(
        "UPDATE coupon SET void = COALESCE(?1, void), reusable = COALESCE(?2, reusable)
         WHERE id = ?3",
    )
    .bind(data.void)
    .bind(data.reusable)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::CouponNotFound));
    }
    find_by_id(pool, id)
        .await?
        .ok_or(RepoError::NotFound(ErrorCode::CouponNotFound))
}

/// Delete a coupon unless a cart still has it applied.
pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_coupon WHERE coupon_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if applied > 0 {
        return Err(RepoError::Conflict(ErrorCode::CouponInUse));
    }
    let rows = sqlx::query("DELETE FROM coupon WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::CouponNotFound));
    }
    Ok(())
}

/// Record a spend inside the order placement transaction.
pub async fn increment_spend(tx: &mut Transaction<'_, Sqlite>, id: &str) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE coupon SET spend_count = spend_count + 1 WHERE id = ?")
        .bind(id)
        .execute(&mut **tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::CouponNotFound));
    }
    Ok(())
}
