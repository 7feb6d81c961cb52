//! Cart repository
//!
//! Carts, their line items, and applied coupons. Item unit prices are
//! snapshotted from the default price list when the item is added.

use super::{RepoError, RepoResult, new_id, now};
use shared::ErrorCode;
use shared::models::{Cart, CartCoupon, CartItem};
use sqlx::{Sqlite, SqlitePool, Transaction};

pub async fn create(pool: &SqlitePool) -> RepoResult<Cart> {
    let id = new_id();
    sqlx::query("INSERT INTO cart (id, created) VALUES (?, ?)")
        .bind(&id)
        .bind(now())
        .execute(pool)
        .await?;
    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create cart".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Cart>> {
    let row = sqlx::query_as::<_, Cart>("SELECT id, created FROM cart WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

// ── Items ───────────────────────────────────────────────────────────

pub async fn find_items(pool: &SqlitePool, cart_id: &str) -> RepoResult<Vec<CartItem>> {
    let rows = sqlx::query_as::<_, CartItem>(
        "SELECT id, cart_id, product_id, qty, unit_price FROM cart_item
         WHERE cart_id = ? ORDER BY id",
    )
    .bind(cart_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Items read inside the order placement transaction.
pub async fn find_items_tx(
    tx: &mut Transaction<'_, Sqlite>,
    cart_id: &str,
) -> RepoResult<Vec<CartItem>> {
    let rows = sqlx::query_as::<_, CartItem>(
        "SELECT id, cart_id, product_id, qty, unit_price FROM cart_item
         WHERE cart_id = ? ORDER BY id",
    )
    .bind(cart_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows)
}

pub async fn find_item(
    pool: &SqlitePool,
    cart_id: &str,
    item_id: &str,
) -> RepoResult<Option<CartItem>> {
    let row = sqlx::query_as::<_, CartItem>(
        "SELECT id, cart_id, product_id, qty, unit_price FROM cart_item
         WHERE id = ? AND cart_id = ?",
    )
    .bind(item_id)
    .bind(cart_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_item_by_product(
    pool: &SqlitePool,
    cart_id: &str,
    product_id: &str,
) -> RepoResult<Option<CartItem>> {
    let row = sqlx::query_as::<_, CartItem>(
        "SELECT id, cart_id, product_id, qty, unit_price FROM cart_item
         WHERE cart_id = ? AND product_id = ?",
    )
    .bind(cart_id)
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn insert_item(
    pool: &SqlitePool,
    cart_id: &str,
    product_id: &str,
    qty: i64,
    unit_price: i64,
) -> RepoResult<CartItem> {
    if find_item_by_product(pool, cart_id, product_id).await?.is_some() {
        return Err(RepoError::Conflict(ErrorCode::CartItemExists));
    }
    let id = new_id();
    sqlx::query(
        "INSERT INTO cart_item (id, cart_id, product_id, qty, unit_price) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(cart_id)
    .bind(product_id)
    .bind(qty)
    .bind(unit_price)
    .execute(pool)
    .await?;
    find_item(pool, cart_id, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to add cart item".into()))
}

pub async fn update_item_qty(
    pool: &SqlitePool,
    cart_id: &str,
    item_id: &str,
    qty: i64,
) -> RepoResult<CartItem> {
    let rows = sqlx::query("UPDATE cart_item SET qty = ? WHERE id = ? AND cart_id = ?")
        .bind(qty)
        .bind(item_id)
        .bind(cart_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::CartItemNotFound));
    }
    find_item(pool, cart_id, item_id)
        .await?
        .ok_or(RepoError::NotFound(ErrorCode::CartItemNotFound))
}

pub async fn delete_item(pool: &SqlitePool, cart_id: &str, item_id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM cart_item WHERE id = ? AND cart_id = ?")
        .bind(item_id)
        .bind(cart_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::CartItemNotFound));
    }
    Ok(())
}

/// Empty the cart. Fails when there is nothing to remove.
pub async fn delete_all_items(pool: &SqlitePool, cart_id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM cart_item WHERE cart_id = ?")
        .bind(cart_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(ErrorCode::CartContainsNoItems));
    }
    Ok(())
}

// ── Coupons ─────────────────────────────────────────────────────────

pub async fn find_coupons(pool: &SqlitePool, cart_id: &str) -> RepoResult<Vec<CartCoupon>> {
    let rows = sqlx::query_as::<_, CartCoupon>(
        "SELECT id, cart_id, coupon_id FROM cart_coupon WHERE cart_id = ? ORDER BY id",
    )
    .bind(cart_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Coupons read inside the order placement transaction.
pub async fn find_coupons_tx(
    tx: &mut Transaction<'_, Sqlite>,
    cart_id: &str,
) -> RepoResult<Vec<CartCoupon>> {
    let rows = sqlx::query_as::<_, CartCoupon>(
        "SELECT id, cart_id, coupon_id FROM cart_coupon WHERE cart_id = ? ORDER BY id",
    )
    .bind(cart_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows)
}

pub async fn find_coupon_by_id(
    pool: &SqlitePool,
    cart_coupon_id: &str,
) -> RepoResult<Option<CartCoupon>> {
    let row = sqlx::query_as::<_, CartCoupon>(
        "SELECT id, cart_id, coupon_id FROM cart_coupon WHERE id = ?",
    )
    .bind(cart_coupon_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_cart_coupon(
    pool: &SqlitePool,
    cart_id: &str,
    cart_coupon_id: &str,
) -> RepoResult<Option<CartCoupon>> {
    let row = sqlx::query_as::<_, CartCoupon>(
        "SELECT id, cart_id, coupon_id FROM cart_coupon WHERE id = ? AND cart_id = ?",
    )
    .bind(cart_coupon_id)
    .bind(cart_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// The attachment row for a (cart, coupon) pair, if the coupon is applied.
pub async fn find_applied_coupon(
    pool: &SqlitePool,
    cart_id: &str,
    coupon_id: &str,
) -> RepoResult<Option<CartCoupon>> {
    let row = sqlx::query_as::<_, CartCoupon>(
        "SELECT id, cart_id, coupon_id FROM cart_coupon WHERE cart_id = ? AND coupon_id = ?",
    )
    .bind(cart_id)
    .bind(coupon_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn insert_coupon(
    pool: &SqlitePool,
    cart_id: &str,
    coupon_id: &str,
) -> RepoResult<CartCoupon> {
    if find_applied_coupon(pool, cart_id, coupon_id).await?.is_some() {
        return Err(RepoError::Conflict(ErrorCode::CartCouponExists));
    }
    let id = new_id();
    sqlx::query("INSERT INTO cart_coupon (id, cart_id, coupon_id) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(cart_id)
        .bind(coupon_id)
        .execute(pool)
        .await?;
    find_cart_coupon(pool, cart_id, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to apply coupon".into()))
}

pub async fn delete_coupon(pool: &SqlitePool, cart_id: &str, cart_coupon_id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM cart_coupon WHERE id = ? AND cart_id = ?")
        .bind(cart_coupon_id)
        .bind(cart_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::CartCouponNotFound));
    }
    Ok(())
}
