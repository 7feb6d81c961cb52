//! Product image repository

use super::{RepoError, RepoResult, new_id};
use shared::ErrorCode;
use shared::models::{ProductImage, ProductImageCreate};
use sqlx::SqlitePool;

pub async fn find_by_product(pool: &SqlitePool, product_id: &str) -> RepoResult<Vec<ProductImage>> {
    let rows = sqlx::query_as::<_, ProductImage>(
        "SELECT id, product_id, url, alt, priority FROM product_image
         WHERE product_id = ? ORDER BY priority, id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    product_id: &str,
    image_id: &str,
) -> RepoResult<Option<ProductImage>> {
    let row = sqlx::query_as::<_, ProductImage>(
        "SELECT id, product_id, url, alt, priority FROM product_image
         WHERE id = ? AND product_id = ?",
    )
    .bind(image_id)
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    product_id: &str,
    data: ProductImageCreate,
) -> RepoResult<ProductImage> {
    let id = new_id();
    sqlx::query(
        "INSERT INTO product_image (id, product_id, url, alt, priority) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(product_id)
    .bind(&data.url)
    .bind(&data.alt)
    .bind(data.priority.unwrap_or(0))
    .execute(pool)
    .await?;
    find_by_id(pool, product_id, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create image".into()))
}

pub async fn delete(pool: &SqlitePool, product_id: &str, image_id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM product_image WHERE id = ? AND product_id = ?")
        .bind(image_id)
        .bind(product_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::ProductImageNotFound));
    }
    Ok(())
}
