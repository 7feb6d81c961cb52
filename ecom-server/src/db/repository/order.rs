//! Order repository
//!
//! Orders are written once, inside the placement transaction, and never
//! structurally modified afterwards. Only `status`, `payment` and
//! `payment_intent_id` change.

use super::{RepoError, RepoResult, new_id};
use chrono::{DateTime, Utc};
use shared::ErrorCode;
use shared::models::{Address, Order, OrderItem};
use sqlx::{Sqlite, SqlitePool, Transaction};

/// Flat order row; addresses are denormalized columns.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_id: i64,
    status: String,
    payment: String,
    payment_intent_id: Option<String>,
    user_id: Option<String>,
    contact_name: Option<String>,
    email: Option<String>,
    billing_recipient_name: String,
    billing_street: String,
    billing_city: String,
    billing_postal_code: String,
    billing_country_code: String,
    shipping_recipient_name: String,
    shipping_street: String,
    shipping_city: String,
    shipping_postal_code: String,
    shipping_country_code: String,
    currency: String,
    total_ex_vat: i64,
    vat_total: i64,
    total_inc_vat: i64,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            order_id: self.order_id,
            status: self.status,
            payment: self.payment,
            payment_intent_id: self.payment_intent_id,
            user_id: self.user_id,
            contact_name: self.contact_name,
            email: self.email,
            billing_address: Address {
                recipient_name: self.billing_recipient_name,
                street: self.billing_street,
                city: self.billing_city,
                postal_code: self.billing_postal_code,
                country_code: self.billing_country_code,
            },
            shipping_address: Address {
                recipient_name: self.shipping_recipient_name,
                street: self.shipping_street,
                city: self.shipping_city,
                postal_code: self.shipping_postal_code,
                country_code: self.shipping_country_code,
            },
            currency: self.currency,
            total_ex_vat: self.total_ex_vat,
            vat_total: self.vat_total,
            total_inc_vat: self.total_inc_vat,
            created: self.created,
            modified: self.modified,
            items,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: String,
    product_path: String,
    sku: String,
    name: String,
    qty: i64,
    unit_price: i64,
    currency: String,
    discount: Option<i64>,
    tax_code: String,
    vat: i64,
}

impl From<OrderItemRow> for OrderItem {
    fn from(r: OrderItemRow) -> Self {
        OrderItem {
            id: r.id,
            product_path: r.product_path,
            sku: r.sku,
            name: r.name,
            qty: r.qty,
            unit_price: r.unit_price,
            currency: r.currency,
            discount: r.discount,
            tax_code: r.tax_code,
            vat: r.vat,
        }
    }
}

const ORDER_COLUMNS: &str = "id, order_id, status, payment, payment_intent_id, user_id, \
    contact_name, email, \
    billing_recipient_name, billing_street, billing_city, billing_postal_code, billing_country_code, \
    shipping_recipient_name, shipping_street, shipping_city, shipping_postal_code, shipping_country_code, \
    currency, total_ex_vat, vat_total, total_inc_vat, created, modified";

const ITEM_COLUMNS: &str =
    "id, product_path, sku, name, qty, unit_price, currency, discount, tax_code, vat";

/// Allocate the next human order number. Runs inside the placement
/// transaction, so concurrent placements serialize on this row.
pub async fn next_order_number(tx: &mut Transaction<'_, Sqlite>) -> RepoResult<i64> {
    sqlx::query("UPDATE order_counter SET value = value + 1 WHERE id = 1")
        .execute(&mut **tx)
        .await?;
    let value: i64 = sqlx::query_scalar("SELECT value FROM order_counter WHERE id = 1")
        .fetch_one(&mut **tx)
        .await?;
    Ok(value)
}

/// Insert the order header inside the placement transaction.
#[allow(clippy::too_many_arguments)]
pub async fn insert(
    tx: &mut Transaction<'_, Sqlite>,
    order: &Order,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (
            id, order_id, status, payment, payment_intent_id, user_id, contact_name, email,
            billing_recipient_name, billing_street, billing_city, billing_postal_code,
            billing_country_code,
            shipping_recipient_name, shipping_street, shipping_city, shipping_postal_code,
            shipping_country_code,
            currency, total_ex_vat, vat_total, total_inc_vat, created, modified
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&order.id)
    .bind(order.order_id)
    .bind(&order.status)
    .bind(&order.payment)
    .bind(&order.payment_intent_id)
    .bind(&order.user_id)
    .bind(&order.contact_name)
    .bind(&order.email)
    .bind(&order.billing_address.recipient_name)
    .bind(&order.billing_address.street)
    .bind(&order.billing_address.city)
    .bind(&order.billing_address.postal_code)
    .bind(&order.billing_address.country_code)
    .bind(&order.shipping_address.recipient_name)
    .bind(&order.shipping_address.street)
    .bind(&order.shipping_address.city)
    .bind(&order.shipping_address.postal_code)
    .bind(&order.shipping_address.country_code)
    .bind(&order.currency)
    .bind(order.total_ex_vat)
    .bind(order.vat_total)
    .bind(order.total_inc_vat)
    .bind(order.created)
    .bind(order.modified)
    .execute(&mut **tx)
    .await?;

    for item in &order.items {
        sqlx::query(
            "INSERT INTO order_item (
                id, order_uuid, product_path, sku, name, qty, unit_price, currency,
                discount, tax_code, vat
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&item.id)
        .bind(&order.id)
        .bind(&item.product_path)
        .bind(&item.sku)
        .bind(&item.name)
        .bind(item.qty)
        .bind(item.unit_price)
        .bind(&item.currency)
        .bind(item.discount)
        .bind(&item.tax_code)
        .bind(item.vat)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders ORDER BY order_id"
    ))
    .fetch_all(pool)
    .await?;
    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let items = find_items(pool, &row.id).await?;
        orders.push(row.into_order(items));
    }
    Ok(orders)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    match row {
        Some(row) => {
            let items = find_items(pool, &row.id).await?;
            Ok(Some(row.into_order(items)))
        }
        None => Ok(None),
    }
}

pub async fn find_items(pool: &SqlitePool, order_uuid: &str) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, OrderItemRow>(&format!(
        "SELECT {ITEM_COLUMNS} FROM order_item WHERE order_uuid = ? ORDER BY id"
    ))
    .bind(order_uuid)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(OrderItem::from).collect())
}

pub async fn set_payment_intent(
    pool: &SqlitePool,
    id: &str,
    payment_intent_id: &str,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE orders SET payment_intent_id = ?, modified = ? WHERE id = ?",
    )
    .bind(payment_intent_id)
    .bind(super::now())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::OrderNotFound));
    }
    Ok(())
}

/// Flip payment status after a successful processor callback.
pub async fn mark_paid(tx: &mut Transaction<'_, Sqlite>, id: &str) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE orders SET payment = 'paid', modified = ? WHERE id = ?",
    )
    .bind(super::now())
    .bind(id)
    .execute(&mut **tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::OrderNotFound));
    }
    Ok(())
}

/// Fresh id for a frozen order line.
pub fn new_item_id() -> String {
    new_id()
}
