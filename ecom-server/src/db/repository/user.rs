//! User and address repository

use super::{RepoError, RepoResult, new_id, now};
use shared::ErrorCode;
use shared::models::{User, UserAddress, UserAddressCreate, UserAddressUpdate, UserCreate, UserUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, email, name, created FROM users ORDER BY created",
    )
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, name, created FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, name, created FROM users WHERE email = ? LIMIT 1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    if find_by_email(pool, &data.email).await?.is_some() {
        return Err(RepoError::Conflict(ErrorCode::UserEmailExists));
    }
    let id = new_id();
    sqlx::query("INSERT INTO users (id, email, name, created) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(&data.email)
        .bind(&data.name)
        .bind(now())
        .execute(pool)
        .await?;
    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn update(pool: &SqlitePool, id: &str, data: UserUpdate) -> RepoResult<User> {
    if let Some(email) = &data.email
        && let Some(other) = find_by_email(pool, email).await?
        && other.id != id
    {
        return Err(RepoError::Conflict(ErrorCode::UserEmailExists));
    }
    let rows = sqlx::query(
        "UPDATE users SET email = COALESCE(?1, email), name = COALESCE(?2, name) WHERE id = ?3",
    )
    .bind(&data.email)
    .bind(&data.name)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::UserNotFound));
    }
    find_by_id(pool, id)
        .await?
        .ok_or(RepoError::NotFound(ErrorCode::UserNotFound))
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::UserNotFound));
    }
    Ok(())
}

// ── Addresses ───────────────────────────────────────────────────────

pub async fn find_addresses(pool: &SqlitePool, user_id: &str) -> RepoResult<Vec<UserAddress>> {
    let addresses = sqlx::query_as::<_, UserAddress>(
        "SELECT id, user_id, recipient_name, street, city, postal_code, country_code
         FROM address WHERE user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(addresses)
}

pub async fn find_address(
    pool: &SqlitePool,
    user_id: &str,
    address_id: &str,
) -> RepoResult<Option<UserAddress>> {
    let address = sqlx::query_as::<_, UserAddress>(
        "SELECT id, user_id, recipient_name, street, city, postal_code, country_code
         FROM address WHERE id = ? AND user_id = ?",
    )
    .bind(address_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(address)
}

pub async fn create_address(
    pool: &SqlitePool,
    user_id: &str,
    data: UserAddressCreate,
) -> RepoResult<UserAddress> {
    if find_by_id(pool, user_id).await?.is_none() {
        return Err(RepoError::NotFound(ErrorCode::UserNotFound));
    }
    let id = new_id();
    sqlx::query(
        "INSERT INTO address (id, user_id, recipient_name, street, city, postal_code, country_code)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(&data.recipient_name)
    .bind(&data.street)
    .bind(&data.city)
    .bind(&data.postal_code)
    .bind(&data.country_code)
    .execute(pool)
    .await?;
    find_address(pool, user_id, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create address".into()))
}

pub async fn update_address(
    pool: &SqlitePool,
    user_id: &str,
    address_id: &str,
    data: UserAddressUpdate,
) -> RepoResult<UserAddress> {
    let rows = sqlx::query(
        "UPDATE address SET
            recipient_name = COALESCE(?1, recipient_name),
            street = COALESCE(?2, street),
            city = COALESCE(?3, city),
            postal_code = COALESCE(?4, postal_code),
            country_code = COALESCE(?5, country_code)
         WHERE id = ?6 AND user_id = ?7",
    )
    .bind(&data.recipient_name)
    .bind(&data.street)
    .bind(&data.city)
    .bind(&data.postal_code)
    .bind(&data.country_code)
    .bind(address_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::AddressNotFound));
    }
    find_address(pool, user_id, address_id)
        .await?
        .ok_or(RepoError::NotFound(ErrorCode::AddressNotFound))
}

pub async fn delete_address(pool: &SqlitePool, user_id: &str, address_id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM address WHERE id = ? AND user_id = ?")
        .bind(address_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::AddressNotFound));
    }
    Ok(())
}
