//! Category tree repository
//!
//! The category table stores a nested set (`lft`/`rgt`/`depth`). There are
//! no row-level mutations: the tree is only ever replaced wholesale, and
//! only while no product-category associations exist.

use super::{RepoError, RepoResult};
use shared::ErrorCode;
use shared::models::Category;
use sqlx::{Sqlite, SqlitePool, Transaction};

/// All categories in nested-set order (`ORDER BY lft`), which is also
/// depth-first document order.
pub async fn load_ordered(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(
        "SELECT id, segment, name, path, lft, rgt, depth FROM category ORDER BY lft",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Category>> {
    let row = sqlx::query_as::<_, Category>(
        "SELECT id, segment, name, path, lft, rgt, depth FROM category WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_path(pool: &SqlitePool, path: &str) -> RepoResult<Option<Category>> {
    let row = sqlx::query_as::<_, Category>(
        "SELECT id, segment, name, path, lft, rgt, depth FROM category WHERE path = ? LIMIT 1",
    )
    .bind(path)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn is_empty(pool: &SqlitePool) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM category")
        .fetch_one(pool)
        .await?;
    Ok(count == 0)
}

/// Replace the whole tree in one transaction.
///
/// Refused while any product-category association exists; associations
/// reference category rows and a replacement would orphan them.
pub async fn batch_replace(pool: &SqlitePool, rows: &[Category]) -> RepoResult<()> {
    let mut tx: Transaction<'_, Sqlite> = pool.begin().await?;

    let assocs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_category")
        .fetch_one(&mut *tx)
        .await?;
    if assocs > 0 {
        return Err(RepoError::Conflict(ErrorCode::AssocsExist));
    }

    sqlx::query("DELETE FROM category").execute(&mut *tx).await?;
    for row in rows {
        sqlx::query(
            "INSERT INTO category (id, segment, name, path, lft, rgt, depth)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.segment)
        .bind(&row.name)
        .bind(&row.path)
        .bind(row.lft)
        .bind(row.rgt)
        .bind(row.depth)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Delete every category. Refused while associations exist, same as
/// [`batch_replace`].
pub async fn purge(pool: &SqlitePool) -> RepoResult<()> {
    let mut tx: Transaction<'_, Sqlite> = pool.begin().await?;

    let assocs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_category")
        .fetch_one(&mut *tx)
        .await?;
    if assocs > 0 {
        return Err(RepoError::Conflict(ErrorCode::AssocsExist));
    }
    sqlx::query("DELETE FROM category").execute(&mut *tx).await?;

    tx.commit().await?;
    Ok(())
}
