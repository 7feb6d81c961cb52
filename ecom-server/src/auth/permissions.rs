//! Authorization table
//!
//! Static operation → roles mapping. Lookups default to deny; `root` passes
//! every check. Customer-visible operations that touch another user's data
//! additionally pass an ownership check in the handler.

use super::Role;

use Role::{Admin, Anon, Customer};

/// Roles permitted for an operation tag, `root` excluded (it is implicit).
/// Unknown tags are denied.
pub fn allowed_roles(operation: &str) -> &'static [Role] {
    match operation {
        // storefront-facing reads
        "products:read" | "catalog:read" | "product-groups:read" | "shipping:read" => {
            &[Admin, Customer, Anon]
        }

        // cart and checkout flows work for guests
        "carts:use" | "orders:place" | "orders:checkout" => &[Admin, Customer, Anon],

        // own-resource reads, ownership enforced in the handler
        "users:read" | "orders:read" => &[Admin, Customer],

        // back office management
        "users:manage"
        | "products:manage"
        | "catalog:write"
        | "assocs:read"
        | "assocs:manage"
        | "product-groups:manage"
        | "price-lists:manage"
        | "prices:manage"
        | "inventory:read"
        | "inventory:manage"
        | "promos:manage"
        | "promos:read"
        | "shipping:manage"
        | "orders:list"
        | "webhooks:manage" => &[Admin],

        _ => &[],
    }
}

pub fn is_allowed(role: Role, operation: &str) -> bool {
    role == Role::Root || allowed_roles(operation).contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_passes_everything_including_unknown_tags() {
        assert!(is_allowed(Role::Root, "webhooks:manage"));
        assert!(is_allowed(Role::Root, "no:such:operation"));
    }

    #[test]
    fn unknown_operations_are_denied() {
        assert!(!is_allowed(Role::Admin, "no:such:operation"));
        assert!(!is_allowed(Role::Anon, "no:such:operation"));
    }

    #[test]
    fn guests_can_shop_but_not_manage() {
        assert!(is_allowed(Role::Anon, "carts:use"));
        assert!(is_allowed(Role::Anon, "orders:place"));
        assert!(!is_allowed(Role::Anon, "webhooks:manage"));
        assert!(!is_allowed(Role::Anon, "orders:read"));
    }

    #[test]
    fn customers_read_own_resources_only_via_table() {
        assert!(is_allowed(Role::Customer, "orders:read"));
        assert!(!is_allowed(Role::Customer, "orders:list"));
        assert!(!is_allowed(Role::Customer, "catalog:write"));
    }
}
