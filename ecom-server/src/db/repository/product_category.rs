//! Product-category association repository
//!
//! Associations may only target leaf categories; the leaf check happens in
//! the catalog service, which owns tree semantics. This module is plain
//! row storage.

use super::{RepoError, RepoResult, new_id};
use chrono::{DateTime, Utc};
use shared::ErrorCode;
use shared::models::{ProductCategory, ProductCategoryCreate, ProductRef};
use sqlx::{Sqlite, SqlitePool, Transaction};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<ProductCategory>> {
    let rows = sqlx::query_as::<_, ProductCategory>(
        "SELECT id, product_id, category_id, priority FROM product_category
         ORDER BY category_id, priority, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<ProductCategory>> {
    let row = sqlx::query_as::<_, ProductCategory>(
        "SELECT id, product_id, category_id, priority FROM product_category WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_pair(
    pool: &SqlitePool,
    product_id: &str,
    category_id: &str,
) -> RepoResult<Option<ProductCategory>> {
    let row = sqlx::query_as::<_, ProductCategory>(
        "SELECT id, product_id, category_id, priority FROM product_category
         WHERE product_id = ? AND category_id = ?",
    )
    .bind(product_id)
    .bind(category_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: &ProductCategoryCreate) -> RepoResult<ProductCategory> {
    if find_pair(pool, &data.product_id, &data.category_id)
        .await?
        .is_some()
    {
        return Err(RepoError::Conflict(ErrorCode::ProductCategoryExists));
    }
    let id = new_id();
    sqlx::query(
        "INSERT INTO product_category (id, product_id, category_id, priority) VALUES (?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&data.product_id)
    .bind(&data.category_id)
    .bind(data.priority.unwrap_or(0))
    .execute(pool)
    .await?;
    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create association".into()))
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM product_category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::ProductCategoryNotFound));
    }
    Ok(())
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_category")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[derive(sqlx::FromRow)]
struct AssocProductRow {
    category_id: String,
    id: String,
    path: String,
    sku: String,
    name: String,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

/// Every association joined with its product snapshot, grouped by caller.
pub async fn all_with_products(pool: &SqlitePool) -> RepoResult<Vec<(String, ProductRef)>> {
    let rows = sqlx::query_as::<_, AssocProductRow>(
        "SELECT pc.category_id, p.id, p.path, p.sku, p.name, p.created, p.modified
         FROM product_category pc
         JOIN product p ON p.id = pc.product_id
         ORDER BY pc.category_id, pc.priority, pc.id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|r| {
            (
                r.category_id,
                ProductRef {
                    id: r.id,
                    path: r.path,
                    sku: r.sku,
                    name: r.name,
                    created: r.created,
                    modified: r.modified,
                },
            )
        })
        .collect())
}

/// Products associated with one category, priority order.
pub async fn products_for_category(
    pool: &SqlitePool,
    category_id: &str,
) -> RepoResult<Vec<ProductRef>> {
    let rows = sqlx::query_as::<_, ProductRef>(
        "SELECT p.id, p.path, p.sku, p.name, p.created, p.modified
         FROM product_category pc
         JOIN product p ON p.id = pc.product_id
         WHERE pc.category_id = ?
         ORDER BY pc.priority, pc.id",
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Replace the associations of the mentioned categories in one
/// transaction; categories not mentioned keep their relations.
///
/// `assignments` pairs a category id with its full ordered product id list;
/// positions become priorities. Callers have already validated that every
/// category is an existing leaf and every product exists.
pub async fn replace_for_categories(
    pool: &SqlitePool,
    assignments: &[(String, Vec<String>)],
) -> RepoResult<()> {
    let mut tx: Transaction<'_, Sqlite> = pool.begin().await?;

    for (category_id, product_ids) in assignments {
        sqlx::query("DELETE FROM product_category WHERE category_id = ?")
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
        for (priority, product_id) in product_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO product_category (id, product_id, category_id, priority)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(new_id())
            .bind(product_id)
            .bind(category_id)
            .bind(priority as i64)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    Ok(())
}
