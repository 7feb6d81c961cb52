//! Promotion rule, offer and coupon models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discount computation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromoKind {
    Percentage,
    Fixed,
}

impl PromoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "percentage" => Some(Self::Percentage),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }
}

/// What the discount applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromoTarget {
    Product,
    Productset,
    Category,
    Total,
    Shipping,
}

impl PromoTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Productset => "productset",
            Self::Category => "category",
            Self::Total => "total",
            Self::Shipping => "shipping",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "product" => Some(Self::Product),
            "productset" => Some(Self::Productset),
            "category" => Some(Self::Category),
            "total" => Some(Self::Total),
            "shipping" => Some(Self::Shipping),
            _ => None,
        }
    }
}

/// Promotion rule entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoRule {
    pub id: String,
    pub name: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    /// Percentage points for `percentage`, minor units for `fixed`.
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: PromoKind,
    pub target: PromoTarget,
    /// Minimum order total (ex-VAT, minor units) for the rule to apply.
    pub threshold: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoRuleCreate {
    pub name: String,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: PromoKind,
    pub target: PromoTarget,
    #[serde(default)]
    pub threshold: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromoRuleUpdate {
    pub name: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub amount: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<PromoKind>,
    pub target: Option<PromoTarget>,
    pub threshold: Option<i64>,
}

/// An activation of a promo rule, unique per rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Offer {
    pub id: String,
    pub promo_rule_id: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferCreate {
    pub promo_rule_id: String,
}

/// Coupon entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Coupon {
    pub id: String,
    /// `^[A-Za-z0-9]{1,32}$`
    pub coupon_code: String,
    pub promo_rule_id: String,
    pub void: bool,
    pub reusable: bool,
    pub spend_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponCreate {
    pub coupon_code: String,
    pub promo_rule_id: String,
    #[serde(default)]
    pub reusable: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CouponUpdate {
    pub void: Option<bool>,
    pub reusable: Option<bool>,
}
