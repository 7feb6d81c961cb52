//! Promotion rule repository

use super::{RepoError, RepoResult, new_id};
use chrono::{DateTime, Utc};
use shared::ErrorCode;
use shared::models::{PromoKind, PromoRule, PromoRuleCreate, PromoRuleUpdate, PromoTarget};
use sqlx::{Sqlite, SqlitePool, Transaction};

/// Raw rule row; kind/target are TEXT before decoding.
#[derive(sqlx::FromRow)]
struct PromoRuleRow {
    id: String,
    name: String,
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    amount: i64,
    kind: String,
    target: String,
    threshold: Option<i64>,
}

impl PromoRuleRow {
    fn decode(self) -> RepoResult<PromoRule> {
        let kind = PromoKind::parse(&self.kind)
            .ok_or_else(|| RepoError::Database(format!("Unknown promo kind: {}", self.kind)))?;
        let target = PromoTarget::parse(&self.target)
            .ok_or_else(|| RepoError::Database(format!("Unknown promo target: {}", self.target)))?;
        Ok(PromoRule {
            id: self.id,
            name: self.name,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            amount: self.amount,
            kind,
            target,
            threshold: self.threshold,
        })
    }
}

const COLUMNS: &str = "id, name, starts_at, ends_at, amount, kind, target, threshold";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<PromoRule>> {
    let rows = sqlx::query_as::<_, PromoRuleRow>(&format!(
        "SELECT {COLUMNS} FROM promo_rule ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(PromoRuleRow::decode).collect()
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<PromoRule>> {
    let row = sqlx::query_as::<_, PromoRuleRow>(&format!(
        "SELECT {COLUMNS} FROM promo_rule WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(PromoRuleRow::decode).transpose()
}

/// Read inside the order placement transaction.
pub async fn find_by_id_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: &str,
) -> RepoResult<Option<PromoRule>> {
    let row = sqlx::query_as::<_, PromoRuleRow>(&format!(
        "SELECT {COLUMNS} FROM promo_rule WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    row.map(PromoRuleRow::decode).transpose()
}

pub async fn create(pool: &SqlitePool, data: PromoRuleCreate) -> RepoResult<PromoRule> {
    let id = new_id();
    sqlx::query(
        "INSERT INTO promo_rule (id, name, starts_at, ends_at, amount, kind, target, threshold)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&data.name)
    .bind(data.starts_at)
    .bind(data.ends_at)
    .bind(data.amount)
    .bind(data.kind.as_str())
    .bind(data.target.as_str())
    .bind(data.threshold)
    .execute(pool)
    .await?;
    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create promo rule".into()))
}

pub async fn update(pool: &SqlitePool, id: &str, data: PromoRuleUpdate) -> RepoResult<PromoRule> {
    let rows = sqlx::query(
        "UPDATE promo_rule SET
            name = COALESCE(?1, name),
            starts_at = COALESCE(?2, starts_at),
            ends_at = COALESCE(?3, ends_at),
            amount = COALESCE(?4, amount),
            kind = COALESCE(?5, kind),
            target = COALESCE(?6, target),
            threshold = COALESCE(?7, threshold)
         WHERE id = ?8",
    )
    .bind(&data.name)
    .bind(data.starts_at)
    .bind(data.ends_at)
    .bind(data.amount)
    .bind(data.kind.map(|k| k.as_str()))
    .bind(data.target.map(|t| t.as_str()))
    .bind(data.threshold)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::PromoRuleNotFound));
    }
    find_by_id(pool, id)
        .await?
        .ok_or(RepoError::NotFound(ErrorCode::PromoRuleNotFound))
}

/// Delete a rule unless a coupon or offer still references it.
pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let coupons: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM coupon WHERE promo_rule_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    let offers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM offer WHERE promo_rule_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if coupons > 0 || offers > 0 {
        return Err(RepoError::Conflict(ErrorCode::PromoRuleInUse));
    }
    let rows = sqlx::query("DELETE FROM promo_rule WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(ErrorCode::PromoRuleNotFound));
    }
    Ok(())
}
