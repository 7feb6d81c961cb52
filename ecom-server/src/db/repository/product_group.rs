//! Product group repository
//!
//! Groups collect related products ("related", "upsell", ...) with an
//! explicit priority order.

use super::{RepoError, RepoResult, new_id};
use shared::ErrorCode;
use shared::models::{
    ProductGroup, ProductGroupCreate, ProductGroupMember, ProductGroupMemberCreate,
    ProductGroupUpdate, ProductRef,
};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<ProductGroup>> {
    let rows = sqlx::query_as::<_, ProductGroup>(
        "SELECT id, name, kind FROM product_group ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<ProductGroup>> {
    let row = sqlx::query_as::<_, ProductGroup>(
        "SELECT id, name, kind FROM product_group WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: ProductGroupCreate) -> RepoResult<ProductGroup> {
    let id = new_id();
    sqlx::query("INSERT INTO product_group (id, name, kind) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(&data.name)
        .bind(&data.kind)
        .execute(pool)
        .await?;
    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product group".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: &str,
    data: ProductGroupUpdate,
) -> RepoResult<ProductGroup> {
    let rows = sqlx::query(
        "UPDATE product_group SET name = COALESCE(?1, name), kind = COALESCE(?2, kind)
         WHERE id = ?3",
    )
    .bind(&data.name)
    .bind(&data.kind)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::ProductGroupNotFound));
    }
    find_by_id(pool, id)
        .await?
        .ok_or(RepoError::NotFound(ErrorCode::ProductGroupNotFound))
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM product_group WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::ProductGroupNotFound));
    }
    Ok(())
}

// ── Members ─────────────────────────────────────────────────────────

pub async fn find_member(
    pool: &SqlitePool,
    group_id: &str,
    product_id: &str,
) -> RepoResult<Option<ProductGroupMember>> {
    let row = sqlx::query_as::<_, ProductGroupMember>(
        "SELECT id, group_id, product_id, priority FROM product_group_member
         WHERE group_id = ? AND product_id = ?",
    )
    .bind(group_id)
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Member products in priority order.
pub async fn member_products(pool: &SqlitePool, group_id: &str) -> RepoResult<Vec<ProductRef>> {
    let rows = sqlx::query_as::<_, ProductRef>(
        "SELECT p.id, p.path, p.sku, p.name, p.created, p.modified
         FROM product_group_member m
         JOIN product p ON p.id = m.product_id
         WHERE m.group_id = ?
         ORDER BY m.priority, m.id",
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn add_member(
    pool: &SqlitePool,
    group_id: &str,
    data: ProductGroupMemberCreate,
) -> RepoResult<ProductGroupMember> {
    if find_member(pool, group_id, &data.product_id).await?.is_some() {
        return Err(RepoError::Conflict(ErrorCode::ProductGroupMemberExists));
    }
    let id = new_id();
    sqlx::query(
        "INSERT INTO product_group_member (id, group_id, product_id, priority)
         VALUES (?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(group_id)
    .bind(&data.product_id)
    .bind(data.priority.unwrap_or(0))
    .execute(pool)
    .await?;
    find_member(pool, group_id, &data.product_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to add group member".into()))
}

pub async fn remove_member(pool: &SqlitePool, group_id: &str, product_id: &str) -> RepoResult<()> {
    let rows = sqlx::query(
        "DELETE FROM product_group_member WHERE group_id = ? AND product_id = ?",
    )
    .bind(group_id)
    .bind(product_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::ProductGroupMemberNotFound));
    }
    Ok(())
}
