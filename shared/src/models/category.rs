//! Category models
//!
//! The category tree is persisted as a nested set: each row carries
//! `lft < rgt` interval coordinates and a pre-order `depth`. A node is a
//! leaf iff `rgt == lft + 1`.

use serde::{Deserialize, Serialize};

use super::product::ProductRef;

/// A persisted category node (nested-set row).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    /// URL-safe path component, unique among siblings.
    pub segment: String,
    pub name: String,
    /// Slash-joined ancestor segments plus own segment.
    pub path: String,
    pub lft: i64,
    pub rgt: i64,
    pub depth: i64,
}

impl Category {
    /// Leaf test: a node with no descendants.
    pub fn is_leaf(&self) -> bool {
        self.rgt == self.lft + 1
    }
}

/// Input node for whole-tree replacement. Sibling order is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCategoryNode {
    pub segment: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<NewCategoryNode>,
}

/// A node of the serialized catalog tree.
///
/// Leaves carry a `products` list (possibly empty); non-leaves never carry
/// the field at all — clients use its presence as the leaf test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTreeNode {
    pub id: String,
    pub segment: String,
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductRef>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CategoryTreeNode>,
}

impl CategoryTreeNode {
    pub fn is_leaf(&self) -> bool {
        self.products.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_products_presence_is_the_leaf_test() {
        let leaf = CategoryTreeNode {
            id: "x".into(),
            segment: "a".into(),
            name: "A".into(),
            path: "a".into(),
            products: Some(vec![]),
            children: vec![],
        };
        let json = serde_json::to_value(&leaf).unwrap();
        assert!(json.get("products").is_some());
        assert!(json.get("children").is_none());

        let branch = CategoryTreeNode {
            products: None,
            children: vec![leaf],
            id: "y".into(),
            segment: "b".into(),
            name: "B".into(),
            path: "b".into(),
        };
        let json = serde_json::to_value(&branch).unwrap();
        assert!(json.get("products").is_none());
        assert!(json.get("children").is_some());
    }
}
