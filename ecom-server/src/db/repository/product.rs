//! Product repository

use super::{RepoError, RepoResult, new_id, now};
use chrono::{DateTime, Utc};
use shared::ErrorCode;
use shared::models::{Product, ProductCreate, ProductData, ProductRef, ProductUpdate};
use sqlx::SqlitePool;
use std::collections::HashSet;

/// Raw product row; `data` is the JSON column before decoding.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: String,
    sku: String,
    path: String,
    name: String,
    data: String,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

impl ProductRow {
    fn decode(self) -> RepoResult<Product> {
        let data: ProductData = serde_json::from_str(&self.data)
            .map_err(|e| RepoError::Database(format!("Corrupt product data: {e}")))?;
        Ok(Product {
            id: self.id,
            sku: self.sku,
            path: self.path,
            name: self.name,
            data,
            created: self.created,
            modified: self.modified,
        })
    }
}

const COLUMNS: &str = "id, sku, path, name, data, created, modified";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {COLUMNS} FROM product ORDER BY created"
    ))
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(ProductRow::decode).collect()
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {COLUMNS} FROM product WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(ProductRow::decode).transpose()
}

pub async fn find_by_path(pool: &SqlitePool, path: &str) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {COLUMNS} FROM product WHERE path = ? LIMIT 1"
    ))
    .bind(path)
    .fetch_optional(pool)
    .await?;
    row.map(ProductRow::decode).transpose()
}

pub async fn find_by_sku(pool: &SqlitePool, sku: &str) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {COLUMNS} FROM product WHERE sku = ? LIMIT 1"
    ))
    .bind(sku)
    .fetch_optional(pool)
    .await?;
    row.map(ProductRow::decode).transpose()
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    if find_by_path(pool, &data.path).await?.is_some() {
        return Err(RepoError::Conflict(ErrorCode::ProductPathExists));
    }
    if find_by_sku(pool, &data.sku).await?.is_some() {
        return Err(RepoError::Conflict(ErrorCode::ProductSkuExists));
    }
    let id = new_id();
    let body = serde_json::to_string(&data.data.unwrap_or_default())
        .map_err(|e| RepoError::Database(format!("Failed to encode product data: {e}")))?;
    let ts = now();
    sqlx::query(
        "INSERT INTO product (id, sku, path, name, data, created, modified)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&data.sku)
    .bind(&data.path)
    .bind(&data.name)
    .bind(&body)
    .bind(ts)
    .bind(ts)
    .execute(pool)
    .await?;
    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: &str, data: ProductUpdate) -> RepoResult<Product> {
    if let Some(path) = &data.path
        && let Some(other) = find_by_path(pool, path).await?
        && other.id != id
    {
        return Err(RepoError::Conflict(ErrorCode::ProductPathExists));
    }
    if let Some(sku) = &data.sku
        && let Some(other) = find_by_sku(pool, sku).await?
        && other.id != id
    {
        return Err(RepoError::Conflict(ErrorCode::ProductSkuExists));
    }
    let body = match &data.data {
        Some(d) => Some(
            serde_json::to_string(d)
                .map_err(|e| RepoError::Database(format!("Failed to encode product data: {e}")))?,
        ),
        None => None,
    };
    let rows = sqlx::query(
        "UPDATE product SET
            sku = COALESCE(?1, sku),
            path = COALESCE(?2, path),
            name = COALESCE(?3, name),
            data = COALESCE(?4, data),
            modified = ?5
         WHERE id = ?6",
    )
    .bind(&data.sku)
    .bind(&data.path)
    .bind(&data.name)
    .bind(&body)
    .bind(now())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::ProductNotFound));
    }
    find_by_id(pool, id)
        .await?
        .ok_or(RepoError::NotFound(ErrorCode::ProductNotFound))
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::ProductNotFound));
    }
    Ok(())
}

/// References for a set of product ids, in no particular order.
pub async fn find_refs(pool: &SqlitePool, ids: &[String]) -> RepoResult<Vec<ProductRef>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT id, path, sku, name, created, modified FROM product WHERE id IN ({placeholders})"
    );
    let mut query = sqlx::query_as::<_, ProductRef>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Ids from `ids` that do not exist in the product table.
pub async fn missing_ids(pool: &SqlitePool, ids: &[String]) -> RepoResult<Vec<String>> {
    let found: HashSet<String> = find_refs(pool, ids).await?.into_iter().map(|r| r.id).collect();
    Ok(ids
        .iter()
        .filter(|id| !found.contains(*id))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::ProductCreate;

    #[tokio::test]
    async fn refs_resolve_known_ids_and_report_missing_ones() {
        let db = DbService::new_in_memory().await.unwrap();
        let a = create(
            &db.pool,
            ProductCreate {
                sku: "A-1".into(),
                path: "a-1".into(),
                name: "A".into(),
                data: None,
            },
        )
        .await
        .unwrap();
        let b = create(
            &db.pool,
            ProductCreate {
                sku: "B-1".into(),
                path: "b-1".into(),
                name: "B".into(),
                data: None,
            },
        )
        .await
        .unwrap();

        let refs = find_refs(
            &db.pool,
            &[a.id.clone(), b.id.clone(), "no-such-id".to_string()],
        )
        .await
        .unwrap();
        assert_eq!(refs.len(), 2);

        let missing = missing_ids(&db.pool, &[a.id.clone(), "no-such-id".to_string()])
            .await
            .unwrap();
        assert_eq!(missing, vec!["no-such-id".to_string()]);

        assert!(find_refs(&db.pool, &[]).await.unwrap().is_empty());
    }
}
