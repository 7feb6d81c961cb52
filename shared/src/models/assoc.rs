//! Product-category relation models

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::product::ProductRef;

/// A (product, leaf category) relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductCategory {
    pub id: String,
    pub product_id: String,
    pub category_id: String,
    pub priority: i64,
}

/// Attach payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCategoryCreate {
    pub product_id: String,
    pub category_id: String,
    #[serde(default)]
    pub priority: Option<i64>,
}

/// Bulk rewrite request: category path → product ids owning that path.
///
/// All-or-nothing: any unknown path, non-leaf path or unknown product
/// aborts the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkRewrite {
    pub assignments: HashMap<String, Vec<String>>,
}

/// Conflict report for a refused bulk rewrite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewriteConflict {
    pub missing_paths: Vec<String>,
    pub non_leaf_paths: Vec<String>,
    pub missing_product_ids: Vec<String>,
}

impl RewriteConflict {
    pub fn is_empty(&self) -> bool {
        self.missing_paths.is_empty()
            && self.non_leaf_paths.is_empty()
            && self.missing_product_ids.is_empty()
    }
}

/// Key choice for [`assoc list`] responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssocKey {
    Id,
    Path,
}

/// Association map keyed by category id or category path.
pub type AssocMap = HashMap<String, Vec<ProductRef>>;
