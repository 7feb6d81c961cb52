//! Inventory repository
//!
//! One onhand count per product, upserted.

use super::{RepoError, RepoResult};
use shared::ErrorCode;
use shared::models::{Inventory, InventoryBatchEntry};
use sqlx::{Sqlite, SqlitePool, Transaction};

pub async fn find_by_product(pool: &SqlitePool, product_id: &str) -> RepoResult<Option<Inventory>> {
    let row = sqlx::query_as::<_, Inventory>(
        "SELECT product_id, onhand FROM inventory WHERE product_id = ?",
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn set(pool: &SqlitePool, product_id: &str, onhand: i64) -> RepoResult<Inventory> {
    sqlx::query(
        "INSERT INTO inventory (product_id, onhand) VALUES (?, ?)
         ON CONFLICT(product_id) DO UPDATE SET onhand = excluded.onhand",
    )
    .bind(product_id)
    .bind(onhand)
    .execute(pool)
    .await?;
    find_by_product(pool, product_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to set inventory".into()))
}

/// Upsert many counts atomically. Fails on the first unknown product id.
pub async fn batch_set(pool: &SqlitePool, entries: &[InventoryBatchEntry]) -> RepoResult<()> {
    let mut tx: Transaction<'_, Sqlite> = pool.begin().await?;
    for entry in entries {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product WHERE id = ?")
            .bind(&entry.product_id)
            .fetch_one(&mut *tx)
            .await?;
        if exists == 0 {
            return Err(RepoError::NotFound(ErrorCode::ProductNotFound));
        }
        sqlx::query(
            "INSERT INTO inventory (product_id, onhand) VALUES (?, ?)
             ON CONFLICT(product_id) DO UPDATE SET onhand = excluded.onhand",
        )
        .bind(&entry.product_id)
        .bind(entry.onhand)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}
