//! Pricing resolver
//!
//! Resolves (product, price list) to a unit price, currency and tax code,
//! and computes VAT amounts from the tax-code table. All arithmetic is in
//! integer minor units.

use sqlx::SqlitePool;

use crate::db::repository::{price, price_list};
use crate::utils::AppResult;
use shared::ErrorCode;

/// Fallback currency when a price list does not pin one.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// A resolved price for one product under one price list.
#[derive(Debug, Clone)]
pub struct ResolvedPrice {
    pub unit_price: i64,
    pub currency: String,
    pub tax_code: String,
}

/// VAT rate for a tax code, as (numerator, denominator).
///
/// Unknown codes fall back to the standard rate rather than silently
/// charging no tax.
pub fn tax_rate(tax_code: &str) -> (i64, i64) {
    match tax_code {
        "zero" => (0, 100),
        "reduced" => (5, 100),
        _ => (20, 100),
    }
}

/// VAT on an ex-VAT amount, rounded half up.
pub fn vat_amount(amount_ex_vat: i64, tax_code: &str) -> i64 {
    let (num, den) = tax_rate(tax_code);
    (amount_ex_vat * num + den / 2) / den
}

/// Resolve pricing for one product.
///
/// With no explicit price list the system default list is consulted; its
/// absence is a named failure so cart and checkout surfaces can report a
/// misconfigured store distinctly.
pub async fn resolve(
    pool: &SqlitePool,
    product_id: &str,
    price_list_id: Option<&str>,
) -> AppResult<ResolvedPrice> {
    let list = match price_list_id {
        Some(id) => price_list::find_by_id(pool, id)
            .await?
            .ok_or(ErrorCode::PriceListNotFound)?,
        None => price_list::find_default(pool).await?,
    };
    let price = price::find_for_product(pool, product_id, &list.id)
        .await?
        .ok_or(ErrorCode::PriceNotFound)?;
    Ok(ResolvedPrice {
        unit_price: price.unit_price,
        currency: list.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        tax_code: price.tax_code,
    })
}

/// Currency of a price list (explicit or fallback), without touching
/// individual prices.
pub async fn list_currency(pool: &SqlitePool, price_list_id: Option<&str>) -> AppResult<String> {
    let list = match price_list_id {
        Some(id) => price_list::find_by_id(pool, id)
            .await?
            .ok_or(ErrorCode::PriceListNotFound)?,
        None => price_list::find_default(pool).await?,
    };
    Ok(list.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::{price as price_repo, price_list as price_list_repo, product};
    use shared::models::{PriceCreate, PriceListCreate, ProductCreate};

    #[test]
    fn vat_rounds_half_up() {
        assert_eq!(vat_amount(1000, "standard"), 200);
        assert_eq!(vat_amount(1000, "reduced"), 50);
        assert_eq!(vat_amount(1000, "zero"), 0);
        // 20% of 33 = 6.6 → 7
        assert_eq!(vat_amount(33, "standard"), 7);
        // 20% of 32 = 6.4 → 6
        assert_eq!(vat_amount(32, "standard"), 6);
    }

    #[tokio::test]
    async fn resolves_against_default_list() {
        let db = DbService::new_in_memory().await.unwrap();
        let err = resolve(&db.pool, "any", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DefaultPriceListMissing);

        let list = price_list_repo::create(
            &db.pool,
            PriceListCreate {
                code: price_list_repo::DEFAULT_CODE.into(),
                name: "Default".into(),
                description: None,
                currency: Some("GBP".into()),
                strategy: None,
            },
        )
        .await
        .unwrap();
        let p = product::create(
            &db.pool,
            ProductCreate {
                sku: "W-1".into(),
                path: "widget".into(),
                name: "Widget".into(),
                data: None,
            },
        )
        .await
        .unwrap();

        let err = resolve(&db.pool, &p.id, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PriceNotFound);

        price_repo::create(
            &db.pool,
            PriceCreate {
                product_id: p.id.clone(),
                price_list_id: list.id.clone(),
                unit_price: 1234,
                tax_code: None,
            },
        )
        .await
        .unwrap();

        let resolved = resolve(&db.pool, &p.id, None).await.unwrap();
        assert_eq!(resolved.unit_price, 1234);
        assert_eq!(resolved.currency, "GBP");
        assert_eq!(resolved.tax_code, "standard");

        // Explicit unknown list id is its own failure.
        let err = resolve(&db.pool, &p.id, Some("missing")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PriceListNotFound);
    }
}
