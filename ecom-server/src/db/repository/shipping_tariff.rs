//! Shipping tariff repository

use super::{RepoError, RepoResult, new_id};
use shared::ErrorCode;
use shared::models::{ShippingTariff, ShippingTariffCreate, ShippingTariffUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, country_code, shipping_code, name, price, tax_code";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<ShippingTariff>> {
    let rows = sqlx::query_as::<_, ShippingTariff>(&format!(
        "SELECT {COLUMNS} FROM shipping_tariff ORDER BY country_code, shipping_code"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<ShippingTariff>> {
    let row = sqlx::query_as::<_, ShippingTariff>(&format!(
        "SELECT {COLUMNS} FROM shipping_tariff WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_code(pool: &SqlitePool, shipping_code: &str) -> RepoResult<Option<ShippingTariff>> {
    let row = sqlx::query_as::<_, ShippingTariff>(&format!(
        "SELECT {COLUMNS} FROM shipping_tariff WHERE shipping_code = ? LIMIT 1"
    ))
    .bind(shipping_code)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Tariffs serving a destination country.
pub async fn find_by_country(pool: &SqlitePool, country_code: &str) -> RepoResult<Vec<ShippingTariff>> {
    let rows = sqlx::query_as::<_, ShippingTariff>(&format!(
        "SELECT {COLUMNS} FROM shipping_tariff WHERE country_code = ? ORDER BY price"
    ))
    .bind(country_code)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: ShippingTariffCreate) -> RepoResult<ShippingTariff> {
    if find_by_code(pool, &data.shipping_code).await?.is_some() {
        return Err(RepoError::Conflict(ErrorCode::ShippingCodeExists));
    }
    let id = new_id();
    sqlx::query(
        "INSERT INTO shipping_tariff (id, country_code, shipping_code, name, price, tax_code)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&data.country_code)
    .bind(&data.shipping_code)
    .bind(&data.name)
    .bind(data.price)
    .bind(data.tax_code.as_deref().unwrap_or("standard"))
    .execute(pool)
    .await?;
    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create shipping tariff".into()))
}

/// `shipping_code` is immutable; updates touch the remaining columns only.
pub async fn update(
    pool: &SqlitePool,
    id: &str,
    data: ShippingTariffUpdate,
) -> RepoResult<ShippingTariff> {
    let rows = sqlx::query(
        "UPDATE shipping_tariff SET
            country_code = COALESCE(?1, country_code),
            name = COALESCE(?2, name),
            price = COALESCE(?3, price),
            tax_code = COALESCE(?4, tax_code)
         WHERE id = ?5",
    )
    .bind(&data.country_code)
    .bind(&data.name)
    .bind(data.price)
    .bind(&data.tax_code)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::ShippingTariffNotFound));
    }
    find_by_id(pool, id)
        .await?
        .ok_or(RepoError::NotFound(ErrorCode::ShippingTariffNotFound))
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM shipping_tariff WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::ShippingTariffNotFound));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn update_touches_fields_but_never_the_code() {
        let db = DbService::new_in_memory().await.unwrap();
        let tariff = create(
            &db.pool,
            ShippingTariffCreate {
                country_code: "PT".into(),
                shipping_code: "PT-STD".into(),
                name: "Standard".into(),
                price: 500,
                tax_code: None,
            },
        )
        .await
        .unwrap();

        let updated = update(
            &db.pool,
            &tariff.id,
            ShippingTariffUpdate {
                price: Some(750),
                name: Some("Tracked".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.price, 750);
        assert_eq!(updated.name, "Tracked");
        assert_eq!(updated.shipping_code, "PT-STD");
        assert_eq!(updated.country_code, "PT");
    }

    #[tokio::test]
    async fn duplicate_codes_are_refused() {
        let db = DbService::new_in_memory().await.unwrap();
        let seed = ShippingTariffCreate {
            country_code: "PT".into(),
            shipping_code: "PT-STD".into(),
            name: "Standard".into(),
            price: 500,
            tax_code: None,
        };
        create(&db.pool, seed.clone()).await.unwrap();
        let err = create(&db.pool, seed).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Conflict(ErrorCode::ShippingCodeExists)
        ));
    }
}
