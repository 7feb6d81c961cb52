//! Registered error-code taxonomy
//!
//! Every failure the API can surface is a registered code with a fixed HTTP
//! status. The server translates storage/service failures 1:1 into these
//! codes; anything unrecognized collapses to [`ErrorCode::Internal`].
//!
//! Wire shape:
//!
//! ```json
//! { "status": 409, "code": "carts/cart-item-exists", "message": "..." }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Registered error codes, grouped by resource family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // ==================== General ====================
    BadRequest,
    Unauthorized,
    Forbidden,
    Unprocessable,
    Internal,

    // ==================== Users ====================
    UserNotFound,
    UserEmailExists,
    AddressNotFound,

    // ==================== Products ====================
    ProductNotFound,
    ProductPathExists,
    ProductSkuExists,
    ProductImageNotFound,

    // ==================== Categories ====================
    CategoryNotFound,
    CategoriesEmpty,
    CategoryNotLeaf,
    AssocsExist,

    // ==================== Product-category relations ====================
    ProductCategoryNotFound,
    ProductCategoryExists,
    ProductCategoryConflict,

    // ==================== Product groups ====================
    ProductGroupNotFound,
    ProductGroupMemberExists,
    ProductGroupMemberNotFound,

    // ==================== Price lists / prices ====================
    PriceListNotFound,
    PriceListCodeExists,
    PriceListInUse,
    DefaultPriceListMissing,
    PriceNotFound,
    PriceExists,

    // ==================== Inventory ====================
    InventoryNotFound,

    // ==================== Carts ====================
    CartNotFound,
    CartItemNotFound,
    CartItemExists,
    CartContainsNoItems,
    CartEmpty,
    CartCouponNotFound,
    CartCouponExists,

    // ==================== Promo rules / offers / coupons ====================
    PromoRuleNotFound,
    PromoRuleInUse,
    OfferNotFound,
    OfferExists,
    CouponNotFound,
    CouponExists,
    CouponInUse,
    CouponVoid,
    CouponExpired,
    CouponUsed,
    CouponNotAtStartDate,

    // ==================== Shipping ====================
    ShippingTariffNotFound,
    ShippingCodeExists,

    // ==================== Orders / payments ====================
    OrderNotFound,
    OrderItemsNotFound,
    PaymentFailed,

    // ==================== Webhooks / events ====================
    WebhookNotFound,
    WebhookExists,
    WebhookPostFailed,
    EventTypeNotFound,
}

impl ErrorCode {
    /// Registered code string, `<family>/<kebab-case>`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad-request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::Unprocessable => "unprocessable",
            Self::Internal => "internal",

            Self::UserNotFound => "users/user-not-found",
            Self::UserEmailExists => "users/user-email-exists",
            Self::AddressNotFound => "users/address-not-found",

            Self::ProductNotFound => "products/product-not-found",
            Self::ProductPathExists => "products/product-path-exists",
            Self::ProductSkuExists => "products/product-sku-exists",
            Self::ProductImageNotFound => "products/product-image-not-found",

            Self::CategoryNotFound => "categories/category-not-found",
            Self::CategoriesEmpty => "categories/categories-empty",
            Self::CategoryNotLeaf => "categories/category-not-leaf",
            Self::AssocsExist => "categories/assocs-exist",

            Self::ProductCategoryNotFound => "product-categories/product-category-not-found",
            Self::ProductCategoryExists => "product-categories/product-category-exists",
            Self::ProductCategoryConflict => "product-categories/bulk-rewrite-conflict",

            Self::ProductGroupNotFound => "product-groups/product-group-not-found",
            Self::ProductGroupMemberExists => "product-groups/member-exists",
            Self::ProductGroupMemberNotFound => "product-groups/member-not-found",

            Self::PriceListNotFound => "price-lists/price-list-not-found",
            Self::PriceListCodeExists => "price-lists/price-list-code-exists",
            Self::PriceListInUse => "price-lists/price-list-in-use",
            Self::DefaultPriceListMissing => "price-lists/default-price-list-missing",
            Self::PriceNotFound => "prices/price-not-found",
            Self::PriceExists => "prices/price-exists",

            Self::InventoryNotFound => "inventory/inventory-not-found",

            Self::CartNotFound => "carts/cart-not-found",
            Self::CartItemNotFound => "carts/cart-item-not-found",
            Self::CartItemExists => "carts/cart-item-exists",
            Self::CartContainsNoItems => "carts/cart-contains-no-items",
            Self::CartEmpty => "carts/cart-empty",
            Self::CartCouponNotFound => "carts/cart-coupon-not-found",
            Self::CartCouponExists => "carts/cart-coupon-exists",

            Self::PromoRuleNotFound => "promo-rules/promo-rule-not-found",
            Self::PromoRuleInUse => "promo-rules/promo-rule-in-use",
            Self::OfferNotFound => "offers/offer-not-found",
            Self::OfferExists => "offers/offer-exists",
            Self::CouponNotFound => "coupons/coupon-not-found",
            Self::CouponExists => "coupons/coupon-exists",
            Self::CouponInUse => "coupons/coupon-in-use",
            Self::CouponVoid => "coupons/coupon-void",
            Self::CouponExpired => "coupons/coupon-expired",
            Self::CouponUsed => "coupons/coupon-used",
            Self::CouponNotAtStartDate => "coupons/coupon-not-at-start-date",

            Self::ShippingTariffNotFound => "shipping-tariffs/shipping-tariff-not-found",
            Self::ShippingCodeExists => "shipping-tariffs/shipping-code-exists",

            Self::OrderNotFound => "orders/order-not-found",
            Self::OrderItemsNotFound => "orders/order-items-not-found",
            Self::PaymentFailed => "payments/payment-failed",

            Self::WebhookNotFound => "webhooks/webhook-not-found",
            Self::WebhookExists => "webhooks/webhook-exists",
            Self::WebhookPostFailed => "webhooks/webhook-post-failed",
            Self::EventTypeNotFound => "events/event-type-not-found",
        }
    }

    /// Fixed HTTP status for this code.
    pub fn status(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::Unprocessable => 422,
            Self::Internal => 500,

            Self::UserNotFound
            | Self::AddressNotFound
            | Self::ProductNotFound
            | Self::ProductImageNotFound
            | Self::CategoryNotFound
            | Self::ProductCategoryNotFound
            | Self::ProductGroupNotFound
            | Self::ProductGroupMemberNotFound
            | Self::PriceListNotFound
            | Self::PriceNotFound
            | Self::InventoryNotFound
            | Self::CartNotFound
            | Self::CartItemNotFound
            | Self::CartCouponNotFound
            | Self::PromoRuleNotFound
            | Self::OfferNotFound
            | Self::CouponNotFound
            | Self::ShippingTariffNotFound
            | Self::OrderNotFound
            | Self::OrderItemsNotFound
            | Self::WebhookNotFound
            | Self::EventTypeNotFound => 404,

            Self::PaymentFailed | Self::WebhookPostFailed => 502,

            // Everything else is a business-rule conflict.
            _ => 409,
        }
    }

    /// Default human-readable message.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad request",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Permission denied",
            Self::Unprocessable => "Unprocessable query",
            Self::Internal => "Internal server error",
            Self::CategoriesEmpty => "Category tree is empty",
            Self::CategoryNotLeaf => "Category is not a leaf",
            Self::AssocsExist => "Product-category relations exist",
            Self::DefaultPriceListMissing => "Default price list is missing",
            Self::CartContainsNoItems => "Cart contains no items",
            Self::CartEmpty => "Cart is empty",
            Self::CouponVoid => "Coupon is void",
            Self::CouponExpired => "Coupon has expired",
            Self::CouponUsed => "Coupon has already been used",
            Self::CouponNotAtStartDate => "Coupon is not valid yet",
            Self::WebhookPostFailed => "Webhook delivery failed",
            Self::EventTypeNotFound => "Unknown event type",
            _ => "Request could not be completed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Error body as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status: code.status(),
            code: code.code().to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_strings_are_namespaced() {
        assert_eq!(ErrorCode::CartNotFound.code(), "carts/cart-not-found");
        assert_eq!(
            ErrorCode::PriceListCodeExists.code(),
            "price-lists/price-list-code-exists"
        );
        assert_eq!(ErrorCode::BadRequest.code(), "bad-request");
    }

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(ErrorCode::OrderNotFound.status(), 404);
        assert_eq!(ErrorCode::CartItemExists.status(), 409);
        assert_eq!(ErrorCode::Unauthorized.status(), 401);
        assert_eq!(ErrorCode::Unprocessable.status(), 422);
        assert_eq!(ErrorCode::WebhookPostFailed.status(), 502);
    }
}
