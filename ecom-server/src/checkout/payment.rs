//! Payment-intent bridge
//!
//! Talks to the card processor's checkout-session REST API (no SDK
//! dependency). `begin_checkout` turns an order into a hosted session;
//! `process_callback` records the processor's session-completed callback
//! idempotently and flips the order's payment state.

use serde_json::Value;
use shared::ErrorCode;
use shared::models::{CheckoutSession, Order};
use sqlx::SqlitePool;

use crate::core::config::ProcessorConfig;
use crate::db::repository::{RepoError, order as order_repo, payment as payment_repo};
use crate::pricing;
use crate::utils::{AppError, AppResult};

use super::order::get_order;

/// Create a hosted checkout session for an order and persist the returned
/// payment intent id.
pub async fn begin_checkout(
    pool: &SqlitePool,
    client: &reqwest::Client,
    processor: &ProcessorConfig,
    order_id: &str,
) -> AppResult<CheckoutSession> {
    let order = get_order(pool, order_id).await?;
    let session = create_session(client, processor, &order).await?;
    order_repo::set_payment_intent(pool, &order.id, &session.session_id).await?;
    tracing::info!(order_id = order.order_id, session = %session.session_id, "checkout session created");
    Ok(session)
}

/// One form call to the processor's checkout-sessions endpoint. Line
/// amounts are gross (unit price plus VAT at the item's tax rate).
async fn create_session(
    client: &reqwest::Client,
    processor: &ProcessorConfig,
    order: &Order,
) -> AppResult<CheckoutSession> {
    let mut form: Vec<(String, String)> = vec![
        ("mode".into(), "payment".into()),
        ("client_reference_id".into(), order.id.clone()),
        ("success_url".into(), processor.success_url.clone()),
        ("cancel_url".into(), processor.cancel_url.clone()),
        ("metadata[order_id]".into(), order.id.clone()),
    ];
    for (i, item) in order.items.iter().enumerate() {
        let gross = item.unit_price + pricing::vat_amount(item.unit_price, &item.tax_code);
        form.push((
            format!("line_items[{i}][price_data][product_data][name]"),
            item.name.clone(),
        ));
        form.push((
            format!("line_items[{i}][price_data][currency]"),
            item.currency.to_lowercase(),
        ));
        form.push((
            format!("line_items[{i}][price_data][unit_amount]"),
            gross.to_string(),
        ));
        form.push((format!("line_items[{i}][quantity]"), item.qty.to_string()));
    }

    let resp: Value = client
        .post(format!("{}/v1/checkout/sessions", processor.api_base))
        .basic_auth(&processor.secret_key, None::<&str>)
        .form(&form)
        .send()
        .await
        .map_err(|e| AppError::with_message(ErrorCode::PaymentFailed, format!("processor unreachable: {e}")))?
        .json()
        .await
        .map_err(|e| AppError::with_message(ErrorCode::PaymentFailed, format!("processor returned invalid JSON: {e}")))?;

    let session_id = resp["id"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::PaymentFailed, format!("session create failed: {resp}"))
        })?;
    let url = resp["url"].as_str().map(String::from);
    Ok(CheckoutSession { session_id, url })
}

/// Handle the processor's session-completed callback.
///
/// Records the raw body against (order, payment intent); a redelivered
/// callback with the same pair is a no-op.
pub async fn process_callback(pool: &SqlitePool, body: &Value) -> AppResult<()> {
    let order_id = body["client_reference_id"]
        .as_str()
        .ok_or_else(|| AppError::bad_request("missing client_reference_id"))?
        .to_string();
    let intent_id = body["payment_intent"]["id"]
        .as_str()
        .or_else(|| body["payment_intent"].as_str())
        .ok_or_else(|| AppError::bad_request("missing payment_intent"))?
        .to_string();

    let raw = serde_json::to_string(body)
        .map_err(|e| AppError::internal(format!("failed to serialize callback: {e}")))?;

    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let fresh = payment_repo::record(&mut tx, &order_id, &intent_id, &raw).await?;
    if fresh {
        order_repo::mark_paid(&mut tx, &order_id).await?;
    }
    tx.commit().await.map_err(RepoError::from)?;

    if fresh {
        tracing::info!(order = %order_id, intent = %intent_id, "payment recorded");
    } else {
        tracing::debug!(order = %order_id, intent = %intent_id, "duplicate payment callback ignored");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carts;
    use crate::checkout::place_order;
    use crate::db::DbService;
    use crate::db::repository::{price, price_list};
    use shared::models::{Address, OrderCreate, PriceCreate, PriceListCreate, ProductCreate};

    async fn seed_order(db: &DbService) -> Order {
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
        let p = crate::db::repository::product::create(
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
        price::create(
            &db.pool,
            PriceCreate {
                product_id: p.id.clone(),
                price_list_id: list.id,
                unit_price: 1000,
                tax_code: None,
            },
        )
        .await
        .unwrap();
        let cart = carts::create_cart(&db.pool).await.unwrap();
        carts::add_item(&db.pool, &cart.id, &p.id, 1).await.unwrap();
        let address = Address {
            recipient_name: "Ada".into(),
            street: "1 Main St".into(),
            city: "Lisboa".into(),
            postal_code: "1000-001".into(),
            country_code: "PT".into(),
        };
        place_order(
            &db.pool,
            OrderCreate {
                cart_id: cart.id,
                contact_name: Some("Ada".into()),
                email: Some("ada@example.test".into()),
                billing_address: Some(address.clone()),
                shipping_address: Some(address),
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn callback_is_idempotent_per_intent() {
        let db = DbService::new_in_memory().await.unwrap();
        let order = seed_order(&db).await;

        let body = serde_json::json!({
            "client_reference_id": order.id,
            "payment_intent": {"id": "pi_123"},
            "amount_total": order.total_inc_vat,
        });
        process_callback(&db.pool, &body).await.unwrap();
        let paid = get_order(&db.pool, &order.id).await.unwrap();
        assert_eq!(paid.payment, "paid");
        assert_eq!(paid.status, "pending");

        // redelivery: no error, no double record
        process_callback(&db.pool, &body).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payment")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn callback_requires_reference_fields() {
        let db = DbService::new_in_memory().await.unwrap();
        let err = process_callback(&db.pool, &serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
    }
}
