//! Catalog domain
//!
//! The category tree (nested set) plus the product-category association
//! layer that rides on top of it.

pub mod assoc;
pub mod service;
pub mod tree;
