//! Cart engine
//!
//! Mutable bags of (product, qty) with unit prices frozen at add time, plus
//! coupon attachment with the full invariant chain.

use chrono::{DateTime, Utc};
use shared::ErrorCode;
use shared::models::{Cart, CartCoupon, CartItem, Coupon, PromoRule};
use sqlx::SqlitePool;

use crate::db::repository::{cart, coupon, product, promo_rule};
use crate::pricing;
use crate::utils::{AppError, AppResult};

pub async fn create_cart(pool: &SqlitePool) -> AppResult<Cart> {
    Ok(cart::create(pool).await?)
}

pub async fn get_cart(pool: &SqlitePool, cart_id: &str) -> AppResult<Cart> {
    cart::find_by_id(pool, cart_id)
        .await?
        .ok_or_else(|| ErrorCode::CartNotFound.into())
}

pub async fn list_items(pool: &SqlitePool, cart_id: &str) -> AppResult<Vec<CartItem>> {
    get_cart(pool, cart_id).await?;
    Ok(cart::find_items(pool, cart_id).await?)
}

/// Add a product to a cart, snapshotting its current default-list price.
pub async fn add_item(
    pool: &SqlitePool,
    cart_id: &str,
    product_id: &str,
    qty: i64,
) -> AppResult<CartItem> {
    if qty < 1 {
        return Err(AppError::bad_request("qty must be at least 1"));
    }
    get_cart(pool, cart_id).await?;
    if product::find_by_id(pool, product_id).await?.is_none() {
        return Err(ErrorCode::ProductNotFound.into());
    }
    let resolved = pricing::resolve(pool, product_id, None).await?;
    Ok(cart::insert_item(pool, cart_id, product_id, qty, resolved.unit_price).await?)
}

/// Items are addressed by product id; (cart, product) is unique.
pub async fn update_item(
    pool: &SqlitePool,
    cart_id: &str,
    product_id: &str,
    qty: i64,
) -> AppResult<CartItem> {
    if qty < 1 {
        return Err(AppError::bad_request("qty must be at least 1"));
    }
    get_cart(pool, cart_id).await?;
    let item = cart::find_item_by_product(pool, cart_id, product_id)
        .await?
        .ok_or(ErrorCode::CartItemNotFound)?;
    Ok(cart::update_item_qty(pool, cart_id, &item.id, qty).await?)
}

pub async fn delete_item(pool: &SqlitePool, cart_id: &str, product_id: &str) -> AppResult<()> {
    get_cart(pool, cart_id).await?;
    let item = cart::find_item_by_product(pool, cart_id, product_id)
        .await?
        .ok_or(ErrorCode::CartItemNotFound)?;
    cart::delete_item(pool, cart_id, &item.id).await?;
    Ok(())
}

/// Empty the cart; an already-empty cart is a named failure so clients can
/// detect idempotence violations.
pub async fn empty(pool: &SqlitePool, cart_id: &str) -> AppResult<()> {
    get_cart(pool, cart_id).await?;
    cart::delete_all_items(pool, cart_id).await?;
    Ok(())
}

// ── Coupons ─────────────────────────────────────────────────────────

/// Coupon invariants, in a fixed check order. Each violation maps to its
/// own named failure.
pub fn check_coupon(coupon: &Coupon, rule: &PromoRule, now: DateTime<Utc>) -> Result<(), ErrorCode> {
    if let Some(starts_at) = rule.starts_at
        && now < starts_at
    {
        return Err(ErrorCode::CouponNotAtStartDate);
    }
    if let Some(ends_at) = rule.ends_at
        && now > ends_at
    {
        return Err(ErrorCode::CouponExpired);
    }
    if coupon.void {
        return Err(ErrorCode::CouponVoid);
    }
    if !coupon.reusable && coupon.spend_count > 0 {
        return Err(ErrorCode::CouponUsed);
    }
    Ok(())
}

/// Check order is fixed: cart → coupon → already attached → time/void/used.
pub async fn apply_coupon(
    pool: &SqlitePool,
    cart_id: &str,
    coupon_id: &str,
) -> AppResult<CartCoupon> {
    get_cart(pool, cart_id).await?;
    let coupon = coupon::find_by_id(pool, coupon_id)
        .await?
        .ok_or(ErrorCode::CouponNotFound)?;
    if cart::find_applied_coupon(pool, cart_id, coupon_id)
        .await?
        .is_some()
    {
        return Err(ErrorCode::CartCouponExists.into());
    }
    let rule = promo_rule::find_by_id(pool, &coupon.promo_rule_id)
        .await?
        .ok_or(ErrorCode::PromoRuleNotFound)?;
    check_coupon(&coupon, &rule, Utc::now())?;
    Ok(cart::insert_coupon(pool, cart_id, coupon_id).await?)
}

pub async fn unapply_coupon(pool: &SqlitePool, cart_id: &str, cart_coupon_id: &str) -> AppResult<()> {
    get_cart(pool, cart_id).await?;
    cart::delete_coupon(pool, cart_id, cart_coupon_id).await?;
    Ok(())
}

pub async fn list_coupons(pool: &SqlitePool, cart_id: &str) -> AppResult<Vec<CartCoupon>> {
    get_cart(pool, cart_id).await?;
    Ok(cart::find_coupons(pool, cart_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::{price, price_list};
    use chrono::Duration;
    use shared::models::{
        CouponCreate, PriceCreate, PriceListCreate, ProductCreate, PromoKind, PromoRuleCreate,
        PromoTarget,
    };

    async fn seed_product(db: &DbService, sku: &str, unit_price: i64) -> String {
        let list = match price_list::find_by_code(&db.pool, price_list::DEFAULT_CODE)
            .await
            .unwrap()
        {
            Some(list) => list,
            None => price_list::create(
                &db.pool,
                PriceListCreate {
                    code: price_list::DEFAULT_CODE.into(),
                    name: "Default".into(),
                    description: None,
                    currency: Some("EUR".into()),
                    strategy: None,
                },
            )
            .await
            .unwrap(),
        };
        let product = crate::db::repository::product::create(
            &db.pool,
            ProductCreate {
                sku: sku.into(),
                path: sku.to_lowercase(),
                name: sku.into(),
                data: None,
            },
        )
        .await
        .unwrap();
        price::create(
            &db.pool,
            PriceCreate {
                product_id: product.id.clone(),
                price_list_id: list.id,
                unit_price,
                tax_code: None,
            },
        )
        .await
        .unwrap();
        product.id
    }

    #[tokio::test]
    async fn add_item_freezes_price_and_enforces_uniqueness() {
        let db = DbService::new_in_memory().await.unwrap();
        let product_id = seed_product(&db, "W-1", 1000).await;
        let cart = create_cart(&db.pool).await.unwrap();

        let item = add_item(&db.pool, &cart.id, &product_id, 2).await.unwrap();
        assert_eq!(item.qty, 2);
        assert_eq!(item.unit_price, 1000);

        let err = add_item(&db.pool, &cart.id, &product_id, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartItemExists);

        // a later price change does not touch the frozen snapshot
        let items = list_items(&db.pool, &cart.id).await.unwrap();
        assert_eq!(items[0].unit_price, 1000);
    }

    #[tokio::test]
    async fn add_item_without_default_price_list() {
        let db = DbService::new_in_memory().await.unwrap();
        let product = crate::db::repository::product::create(
            &db.pool,
            ProductCreate {
                sku: "W-1".into(),
                path: "w-1".into(),
                name: "W".into(),
                data: None,
            },
        )
        .await
        .unwrap();
        let cart = create_cart(&db.pool).await.unwrap();
        let err = add_item(&db.pool, &cart.id, &product.id, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DefaultPriceListMissing);
    }

    #[tokio::test]
    async fn items_are_addressed_by_product_id() {
        let db = DbService::new_in_memory().await.unwrap();
        let product_id = seed_product(&db, "W-1", 1000).await;
        let cart = create_cart(&db.pool).await.unwrap();
        add_item(&db.pool, &cart.id, &product_id, 2).await.unwrap();

        let updated = update_item(&db.pool, &cart.id, &product_id, 5).await.unwrap();
        assert_eq!(updated.qty, 5);
        assert_eq!(updated.product_id, product_id);

        delete_item(&db.pool, &cart.id, &product_id).await.unwrap();
        let err = update_item(&db.pool, &cart.id, &product_id, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartItemNotFound);
    }

    #[tokio::test]
    async fn empty_cart_twice_is_a_named_failure() {
        let db = DbService::new_in_memory().await.unwrap();
        let product_id = seed_product(&db, "W-1", 500).await;
        let cart = create_cart(&db.pool).await.unwrap();
        add_item(&db.pool, &cart.id, &product_id, 1).await.unwrap();

        empty(&db.pool, &cart.id).await.unwrap();
        let err = empty(&db.pool, &cart.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartContainsNoItems);
    }

    #[tokio::test]
    async fn coupon_lifecycle() {
        let db = DbService::new_in_memory().await.unwrap();
        let now = Utc::now();
        let rule = promo_rule::create(
            &db.pool,
            PromoRuleCreate {
                name: "10% off".into(),
                starts_at: Some(now - Duration::minutes(30)),
                ends_at: Some(now + Duration::minutes(30)),
                amount: 10,
                kind: PromoKind::Percentage,
                target: PromoTarget::Total,
                threshold: None,
            },
        )
        .await
        .unwrap();
        let c = coupon::create(
            &db.pool,
            CouponCreate {
                coupon_code: "WELCOME10".into(),
                promo_rule_id: rule.id.clone(),
                reusable: Some(false),
            },
        )
        .await
        .unwrap();
        let cart = create_cart(&db.pool).await.unwrap();

        apply_coupon(&db.pool, &cart.id, &c.id).await.unwrap();
        let err = apply_coupon(&db.pool, &cart.id, &c.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartCouponExists);
    }

    #[tokio::test]
    async fn reapplying_an_attached_coupon_wins_over_later_expiry() {
        let db = DbService::new_in_memory().await.unwrap();
        let now = Utc::now();
        let rule = promo_rule::create(
            &db.pool,
            PromoRuleCreate {
                name: "10% off".into(),
                starts_at: None,
                ends_at: Some(now + Duration::minutes(30)),
                amount: 10,
                kind: PromoKind::Percentage,
                target: PromoTarget::Total,
                threshold: None,
            },
        )
        .await
        .unwrap();
        let c = coupon::create(
            &db.pool,
            CouponCreate {
                coupon_code: "LATE10".into(),
                promo_rule_id: rule.id.clone(),
                reusable: Some(true),
            },
        )
        .await
        .unwrap();
        let cart = create_cart(&db.pool).await.unwrap();
        apply_coupon(&db.pool, &cart.id, &c.id).await.unwrap();

        // the rule's window closes while the coupon stays attached
        sqlx::query("UPDATE promo_rule SET ends_at = ? WHERE id = ?")
            .bind(now - Duration::hours(1))
            .bind(&rule.id)
            .execute(&db.pool)
            .await
            .unwrap();

        let err = apply_coupon(&db.pool, &cart.id, &c.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartCouponExists);
    }

    #[test]
    fn coupon_time_window_checks() {
        let now = Utc::now();
        let rule = PromoRule {
            id: "r".into(),
            name: "r".into(),
            starts_at: Some(now + Duration::hours(1)),
            ends_at: Some(now + Duration::hours(2)),
            amount: 10,
            kind: PromoKind::Percentage,
            target: PromoTarget::Total,
            threshold: None,
        };
        let coupon = Coupon {
            id: "c".into(),
            coupon_code: "C1".into(),
            promo_rule_id: "r".into(),
            void: false,
            reusable: false,
            spend_count: 0,
        };

        assert_eq!(
            check_coupon(&coupon, &rule, now),
            Err(ErrorCode::CouponNotAtStartDate)
        );
        assert_eq!(
            check_coupon(&coupon, &rule, now + Duration::hours(3)),
            Err(ErrorCode::CouponExpired)
        );
        assert_eq!(
            check_coupon(&coupon, &rule, now + Duration::minutes(90)),
            Ok(())
        );

        let voided = Coupon { void: true, ..coupon.clone() };
        assert_eq!(
            check_coupon(&voided, &rule, now + Duration::minutes(90)),
            Err(ErrorCode::CouponVoid)
        );
        let spent = Coupon { spend_count: 1, ..coupon };
        assert_eq!(
            check_coupon(&spent, &rule, now + Duration::minutes(90)),
            Err(ErrorCode::CouponUsed)
        );
    }
}
