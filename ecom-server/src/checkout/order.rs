//! Order pipeline
//!
//! Turns a cart into an immutable order in a single transaction: items are
//! frozen into snapshots, addresses are copied in, the human order number
//! is allocated from a counter row, and non-reusable coupons record their
//! spend. Nothing escapes the transaction half-done.

use chrono::Utc;
use shared::ErrorCode;
use shared::models::{
    Address, CartItem, Coupon, Order, OrderCreate, OrderItem, PromoKind, PromoRule, PromoTarget,
};
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::carts;
use crate::db::repository::{
    cart, coupon as coupon_repo, order as order_repo, price_list, product, promo_rule, user,
};
use crate::pricing;
use crate::utils::{AppError, AppResult};

/// The two accepted request shapes.
enum Shape {
    User {
        user_id: String,
        billing_address_id: String,
        shipping_address_id: String,
    },
    Guest {
        contact_name: String,
        email: String,
        billing_address: Address,
        shipping_address: Address,
    },
}

fn classify(req: &OrderCreate) -> AppResult<Shape> {
    let user_fields = req.user_id.is_some()
        || req.billing_address_id.is_some()
        || req.shipping_address_id.is_some();
    let guest_fields = req.contact_name.is_some()
        || req.email.is_some()
        || req.billing_address.is_some()
        || req.shipping_address.is_some();

    match (user_fields, guest_fields) {
        (true, true) => Err(AppError::bad_request(
            "supply either the user fields or the guest fields, not both",
        )),
        (false, false) => Err(AppError::bad_request(
            "supply user_id with address ids, or guest contact details with addresses",
        )),
        (true, false) => Ok(Shape::User {
            user_id: req
                .user_id
                .clone()
                .ok_or_else(|| AppError::bad_request("user_id is required"))?,
            billing_address_id: req
                .billing_address_id
                .clone()
                .ok_or_else(|| AppError::bad_request("billing_address_id is required"))?,
            shipping_address_id: req
                .shipping_address_id
                .clone()
                .ok_or_else(|| AppError::bad_request("shipping_address_id is required"))?,
        }),
        (false, true) => Ok(Shape::Guest {
            contact_name: req
                .contact_name
                .clone()
                .ok_or_else(|| AppError::bad_request("contact_name is required"))?,
            email: req
                .email
                .clone()
                .ok_or_else(|| AppError::bad_request("email is required"))?,
            billing_address: req
                .billing_address
                .clone()
                .ok_or_else(|| AppError::bad_request("billing_address is required"))?,
            shipping_address: req
                .shipping_address
                .clone()
                .ok_or_else(|| AppError::bad_request("shipping_address is required"))?,
        }),
    }
}

/// Per-line discount allocation for an attached coupon.
///
/// Percentage rules discount each line by its share; fixed rules are
/// allocated proportionally to line value, with the rounding remainder
/// landing on the last line. A `shipping` target leaves item lines alone.
fn allocate_discounts(lines_ex_vat: &[i64], rule: &PromoRule) -> Vec<i64> {
    let subtotal: i64 = lines_ex_vat.iter().sum();
    if subtotal == 0 || rule.target == PromoTarget::Shipping {
        return vec![0; lines_ex_vat.len()];
    }
    if let Some(threshold) = rule.threshold
        && subtotal < threshold
    {
        return vec![0; lines_ex_vat.len()];
    }
    match rule.kind {
        PromoKind::Percentage => lines_ex_vat
            .iter()
            .map(|line| (line * rule.amount + 50) / 100)
            .collect(),
        PromoKind::Fixed => {
            let total = rule.amount.min(subtotal);
            let mut out = Vec::with_capacity(lines_ex_vat.len());
            let mut allocated = 0;
            for (i, line) in lines_ex_vat.iter().enumerate() {
                let share = if i + 1 == lines_ex_vat.len() {
                    total - allocated
                } else {
                    total * line / subtotal
                };
                allocated += share;
                out.push(share);
            }
            out
        }
    }
}

/// Place an order from a cart. See module docs for the transaction scope.
pub async fn place_order(pool: &SqlitePool, req: OrderCreate) -> AppResult<Order> {
    let shape = classify(&req)?;
    let price_list_id = req.price_list_id.as_deref();

    // Pre-transaction validation and pricing resolution (reads only).
    carts::get_cart(pool, &req.cart_id).await?;
    if let Some(id) = price_list_id {
        price_list::find_by_id(pool, id)
            .await?
            .ok_or(ErrorCode::PriceListNotFound)?;
    }
    let currency = pricing::list_currency(pool, price_list_id).await?;

    let (contact_name, email, user_id, billing_address, shipping_address) = match shape {
        Shape::User {
            user_id,
            billing_address_id,
            shipping_address_id,
        } => {
            user::find_by_id(pool, &user_id)
                .await?
                .ok_or(ErrorCode::UserNotFound)?;
            let billing = user::find_address(pool, &user_id, &billing_address_id)
                .await?
                .ok_or(ErrorCode::AddressNotFound)?;
            let shipping = user::find_address(pool, &user_id, &shipping_address_id)
                .await?
                .ok_or(ErrorCode::AddressNotFound)?;
            (
                None,
                None,
                Some(user_id),
                Address {
                    recipient_name: billing.recipient_name,
                    street: billing.street,
                    city: billing.city,
                    postal_code: billing.postal_code,
                    country_code: billing.country_code,
                },
                Address {
                    recipient_name: shipping.recipient_name,
                    street: shipping.street,
                    city: shipping.city,
                    postal_code: shipping.postal_code,
                    country_code: shipping.country_code,
                },
            )
        }
        Shape::Guest {
            contact_name,
            email,
            billing_address,
            shipping_address,
        } => (
            Some(contact_name),
            Some(email),
            None,
            billing_address,
            shipping_address,
        ),
    };

    // Resolve product snapshots and tax codes before opening the
    // transaction; products and prices are not part of the cart's write
    // set. Items are re-read inside the transaction.
    let preview = cart::find_items(pool, &req.cart_id).await?;
    if preview.is_empty() {
        return Err(ErrorCode::CartEmpty.into());
    }
    let mut snapshot_of: HashMap<String, (ProductSnapshot, String)> = HashMap::new();
    for snap in snapshot_products(pool, &preview).await? {
        let resolved = pricing::resolve(pool, &snap.product_id, price_list_id).await?;
        snapshot_of.insert(snap.product_id.clone(), (snap, resolved.tax_code));
    }

    // ── The placement transaction ───────────────────────────────────
    let mut tx = pool.begin().await.map_err(crate::db::repository::RepoError::from)?;

    let items = cart::find_items_tx(&mut tx, &req.cart_id).await?;
    if items.is_empty() {
        return Err(ErrorCode::CartEmpty.into());
    }

    // Re-validate attached coupons inside the transaction.
    let cart_coupons = cart::find_coupons_tx(&mut tx, &req.cart_id).await?;
    let mut attached: Option<(Coupon, PromoRule)> = None;
    if let Some(cc) = cart_coupons.first() {
        let coupon = coupon_repo::find_by_id_tx(&mut tx, &cc.coupon_id)
            .await?
            .ok_or(ErrorCode::CouponNotFound)?;
        let rule = promo_rule::find_by_id_tx(&mut tx, &coupon.promo_rule_id)
            .await?
            .ok_or(ErrorCode::PromoRuleNotFound)?;
        carts::check_coupon(&coupon, &rule, Utc::now())?;
        attached = Some((coupon, rule));
    }

    // Freeze items into order lines.
    let lines_ex_vat: Vec<i64> = items.iter().map(|i| i.qty * i.unit_price).collect();
    let discounts = match &attached {
        Some((_, rule)) => allocate_discounts(&lines_ex_vat, rule),
        None => vec![0; items.len()],
    };

    let mut order_items = Vec::with_capacity(items.len());
    let mut total_ex_vat = 0;
    let mut vat_total = 0;
    for (item, discount) in items.iter().zip(&discounts) {
        let (snapshot, tax_code) = snapshot_of
            .get(&item.product_id)
            .ok_or(ErrorCode::ProductNotFound)?;
        let line_ex_vat = item.qty * item.unit_price - discount;
        let vat = pricing::vat_amount(line_ex_vat, tax_code);
        total_ex_vat += line_ex_vat;
        vat_total += vat;
        order_items.push(OrderItem {
            id: order_repo::new_item_id(),
            product_path: snapshot.path.clone(),
            sku: snapshot.sku.clone(),
            name: snapshot.name.clone(),
            qty: item.qty,
            unit_price: item.unit_price,
            currency: currency.clone(),
            discount: (*discount > 0).then_some(*discount),
            tax_code: tax_code.clone(),
            vat,
        });
    }

    let order_number = order_repo::next_order_number(&mut tx).await?;
    let ts = Utc::now();
    let order = Order {
        id: crate::db::repository::new_id(),
        order_id: order_number,
        status: "pending".into(),
        payment: "unpaid".into(),
        payment_intent_id: None,
        user_id,
        contact_name,
        email,
        billing_address,
        shipping_address,
        currency,
        total_ex_vat,
        vat_total,
        total_inc_vat: total_ex_vat + vat_total,
        created: ts,
        modified: ts,
        items: order_items,
    };
    order_repo::insert(&mut tx, &order).await?;

    if let Some((coupon, _)) = &attached
        && !coupon.reusable
    {
        coupon_repo::increment_spend(&mut tx, &coupon.id).await?;
    }

    tx.commit().await.map_err(crate::db::repository::RepoError::from)?;
    tracing::info!(order_id = order.order_id, total = order.total_inc_vat, "order placed");
    Ok(order)
}

struct ProductSnapshot {
    product_id: String,
    path: String,
    sku: String,
    name: String,
}

async fn snapshot_products(
    pool: &SqlitePool,
    items: &[CartItem],
) -> AppResult<Vec<ProductSnapshot>> {
    let ids: Vec<String> = items.iter().map(|i| i.product_id.clone()).collect();
    let refs = product::find_refs(pool, &ids).await?;
    let by_id: HashMap<String, &shared::models::ProductRef> =
        refs.iter().map(|r| (r.id.clone(), r)).collect();
    items
        .iter()
        .map(|item| {
            by_id
                .get(&item.product_id)
                .map(|r| ProductSnapshot {
                    product_id: r.id.clone(),
                    path: r.path.clone(),
                    sku: r.sku.clone(),
                    name: r.name.clone(),
                })
                .ok_or_else(|| ErrorCode::ProductNotFound.into())
        })
        .collect()
}

/// Order read path; the order is self-contained.
pub async fn get_order(pool: &SqlitePool, id: &str) -> AppResult<Order> {
    let order = order_repo::find_by_id(pool, id)
        .await?
        .ok_or(ErrorCode::OrderNotFound)?;
    if order.items.is_empty() {
        return Err(ErrorCode::OrderItemsNotFound.into());
    }
    Ok(order)
}

pub async fn list_orders(pool: &SqlitePool) -> AppResult<Vec<Order>> {
    Ok(order_repo::find_all(pool).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::{coupon as coupon_repo, price, price_list, promo_rule};
    use shared::models::{
        CouponCreate, PriceCreate, PriceListCreate, ProductCreate, PromoRuleCreate,
    };

    fn guest_addresses() -> (Address, Address) {
        let billing = Address {
            recipient_name: "Ada".into(),
            street: "1 Main St".into(),
            city: "Lisboa".into(),
            postal_code: "1000-001".into(),
            country_code: "PT".into(),
        };
        let shipping = Address {
            recipient_name: "Ada".into(),
            street: "2 Dock Rd".into(),
            city: "Porto".into(),
            postal_code: "4000-001".into(),
            country_code: "PT".into(),
        };
        (billing, shipping)
    }

    async fn seed_cart(db: &DbService, prices: &[i64]) -> String {
        let list = price_list::create(
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
        .unwrap();
        let cart = carts::create_cart(&db.pool).await.unwrap();
        for (i, unit_price) in prices.iter().enumerate() {
            let p = crate::db::repository::product::create(
                &db.pool,
                ProductCreate {
                    sku: format!("SKU-{i}"),
                    path: format!("item-{i}"),
                    name: format!("Item {i}"),
                    data: None,
                },
            )
            .await
            .unwrap();
            price::create(
                &db.pool,
                PriceCreate {
                    product_id: p.id.clone(),
                    price_list_id: list.id.clone(),
                    unit_price: *unit_price,
                    tax_code: None,
                },
            )
            .await
            .unwrap();
            carts::add_item(&db.pool, &cart.id, &p.id, 1).await.unwrap();
        }
        cart.id
    }

    fn guest_request(cart_id: &str) -> OrderCreate {
        let (billing, shipping) = guest_addresses();
        OrderCreate {
            cart_id: cart_id.to_string(),
            contact_name: Some("Ada".into()),
            email: Some("ada@example.test".into()),
            billing_address: Some(billing),
            shipping_address: Some(shipping),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn guest_order_totals_and_snapshots() {
        let db = DbService::new_in_memory().await.unwrap();
        let cart_id = seed_cart(&db, &[1000, 500]).await;

        let order = place_order(&db.pool, guest_request(&cart_id)).await.unwrap();
        assert_eq!(order.order_id, 1);
        assert_eq!(order.status, "pending");
        assert_eq!(order.payment, "unpaid");
        assert_eq!(order.total_ex_vat, 1500);
        assert_eq!(order.vat_total, 300);
        assert_eq!(order.total_inc_vat, 1800);
        assert_eq!(order.billing_address.city, "Lisboa");
        assert_eq!(order.shipping_address.city, "Porto");
        assert_eq!(order.items.len(), 2);

        // read path returns the same self-contained order
        let read = get_order(&db.pool, &order.id).await.unwrap();
        assert_eq!(read.total_inc_vat, 1800);
        assert_eq!(read.items.len(), 2);

        // the cart is not emptied on success
        let items = carts::list_items(&db.pool, &cart_id).await.unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn order_numbers_are_monotonic() {
        let db = DbService::new_in_memory().await.unwrap();
        let first = seed_cart(&db, &[100]).await;
        let o1 = place_order(&db.pool, guest_request(&first)).await.unwrap();
        let o2 = place_order(&db.pool, guest_request(&first)).await.unwrap();
        assert_eq!(o1.order_id, 1);
        assert_eq!(o2.order_id, 2);
    }

    #[tokio::test]
    async fn empty_cart_is_refused() {
        let db = DbService::new_in_memory().await.unwrap();
        price_list::create(
            &db.pool,
            PriceListCreate {
                code: price_list::DEFAULT_CODE.into(),
                name: "Default".into(),
                description: None,
                currency: None,
                strategy: None,
            },
        )
        .await
        .unwrap();
        let cart = carts::create_cart(&db.pool).await.unwrap();
        let err = place_order(&db.pool, guest_request(&cart.id)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartEmpty);
    }

    #[tokio::test]
    async fn mixing_user_and_guest_shapes_is_rejected() {
        let db = DbService::new_in_memory().await.unwrap();
        let cart_id = seed_cart(&db, &[100]).await;
        let mut req = guest_request(&cart_id);
        req.user_id = Some("someone".into());
        let err = place_order(&db.pool, req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);

        let neither = OrderCreate {
            cart_id,
            ..Default::default()
        };
        let err = place_order(&db.pool, neither).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
    }

    #[tokio::test]
    async fn coupon_spend_recorded_in_the_same_transaction() {
        let db = DbService::new_in_memory().await.unwrap();
        let cart_id = seed_cart(&db, &[1000, 500]).await;
        let rule = promo_rule::create(
            &db.pool,
            PromoRuleCreate {
                name: "10% off".into(),
                starts_at: None,
                ends_at: None,
                amount: 10,
                kind: shared::models::PromoKind::Percentage,
                target: shared::models::PromoTarget::Total,
                threshold: None,
            },
        )
        .await
        .unwrap();
        let coupon = coupon_repo::create(
            &db.pool,
            CouponCreate {
                coupon_code: "TEN".into(),
                promo_rule_id: rule.id,
                reusable: Some(false),
            },
        )
        .await
        .unwrap();
        carts::apply_coupon(&db.pool, &cart_id, &coupon.id).await.unwrap();

        let order = place_order(&db.pool, guest_request(&cart_id)).await.unwrap();
        // 10% off 1000 and 500
        assert_eq!(order.total_ex_vat, 1350);
        assert_eq!(order.items[0].discount, Some(100));
        assert_eq!(order.items[1].discount, Some(50));
        assert_eq!(order.vat_total, pricing::vat_amount(900, "standard") + pricing::vat_amount(450, "standard"));

        let spent = coupon_repo::find_by_id(&db.pool, &coupon.id).await.unwrap().unwrap();
        assert_eq!(spent.spend_count, 1);

        // second placement from the same cart: the used coupon aborts it
        let err = place_order(&db.pool, guest_request(&cart_id)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CouponUsed);
    }

    #[test]
    fn fixed_discount_allocation_is_proportional_with_last_line_remainder() {
        let rule = PromoRule {
            id: "r".into(),
            name: "r".into(),
            starts_at: None,
            ends_at: None,
            amount: 100,
            kind: PromoKind::Fixed,
            target: PromoTarget::Total,
            threshold: None,
        };
        let discounts = allocate_discounts(&[999, 501], &rule);
        assert_eq!(discounts.iter().sum::<i64>(), 100);
        assert_eq!(discounts, vec![66, 34]);

        // fixed discount never exceeds the subtotal
        let discounts = allocate_discounts(&[30, 20], &rule);
        assert_eq!(discounts.iter().sum::<i64>(), 50);
    }

    #[test]
    fn threshold_gates_the_discount() {
        let rule = PromoRule {
            id: "r".into(),
            name: "r".into(),
            starts_at: None,
            ends_at: None,
            amount: 10,
            kind: PromoKind::Percentage,
            target: PromoTarget::Total,
            threshold: Some(2000),
        };
        assert_eq!(allocate_discounts(&[1000, 500], &rule), vec![0, 0]);
        assert_eq!(allocate_discounts(&[1500, 500], &rule), vec![150, 50]);
    }
}
