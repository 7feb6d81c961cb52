//! Product-category associator
//!
//! Attach/detach of single relations, the all-or-nothing bulk rewrite, and
//! the keyed association listing. Only leaf categories may carry products.

use shared::ErrorCode;
use shared::models::{
    AssocKey, AssocMap, BulkRewrite, Category, ProductCategory, ProductCategoryCreate,
    RewriteConflict,
};
use sqlx::SqlitePool;
use std::collections::{HashMap, HashSet};

use crate::db::repository::{category_tree, product, product_category};
use crate::utils::AppResult;

/// Attach a product to a leaf category.
pub async fn attach(pool: &SqlitePool, data: ProductCategoryCreate) -> AppResult<ProductCategory> {
    if product::find_by_id(pool, &data.product_id).await?.is_none() {
        return Err(ErrorCode::ProductNotFound.into());
    }
    let category = category_tree::find_by_id(pool, &data.category_id)
        .await?
        .ok_or(ErrorCode::CategoryNotFound)?;
    if !category.is_leaf() {
        return Err(ErrorCode::CategoryNotLeaf.into());
    }
    Ok(product_category::create(pool, &data).await?)
}

/// Remove a relation by its id.
pub async fn detach(pool: &SqlitePool, relation_id: &str) -> AppResult<()> {
    product_category::delete(pool, relation_id).await?;
    Ok(())
}

/// Replace the relations of every mentioned path atomically.
///
/// All requested paths must exist and be leaves and all products must
/// exist; otherwise nothing is written and the full conflict report comes
/// back.
pub async fn bulk_rewrite(
    pool: &SqlitePool,
    request: &BulkRewrite,
) -> AppResult<Result<(), RewriteConflict>> {
    let mut conflict = RewriteConflict::default();
    let mut assignments: Vec<(String, Vec<String>)> = Vec::new();

    // Deterministic processing order for the report.
    let mut paths: Vec<&String> = request.assignments.keys().collect();
    paths.sort();

    for path in &paths {
        match category_tree::find_by_path(pool, path).await? {
            None => conflict.missing_paths.push((*path).clone()),
            Some(category) if !category.is_leaf() => {
                conflict.non_leaf_paths.push((*path).clone())
            }
            Some(category) => {
                assignments.push((category.id, request.assignments[*path].clone()));
            }
        }
    }

    let mut all_products: Vec<String> = request
        .assignments
        .values()
        .flatten()
        .cloned()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    all_products.sort();
    let mut missing = product::missing_ids(pool, &all_products).await?;
    missing.sort();
    conflict.missing_product_ids = missing;

    if !conflict.is_empty() {
        return Ok(Err(conflict));
    }

    product_category::replace_for_categories(pool, &assignments).await?;
    tracing::info!(paths = assignments.len(), "associations rewritten");
    Ok(Ok(()))
}

/// Associations as a map keyed by category id or category path, each entry
/// carrying product snapshots in priority order.
pub async fn list_by_key(pool: &SqlitePool, key: AssocKey) -> AppResult<AssocMap> {
    let pairs = product_category::all_with_products(pool).await?;
    let mut map: AssocMap = HashMap::new();
    match key {
        AssocKey::Id => {
            for (category_id, product) in pairs {
                map.entry(category_id).or_default().push(product);
            }
        }
        AssocKey::Path => {
            let categories = category_tree::load_ordered(pool).await?;
            let path_of: HashMap<String, String> = categories
                .into_iter()
                .map(|c: Category| (c.id, c.path))
                .collect();
            for (category_id, product) in pairs {
                if let Some(path) = path_of.get(&category_id) {
                    map.entry(path.clone()).or_default().push(product);
                }
            }
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::service;
    use crate::db::DbService;
    use shared::models::{NewCategoryNode, ProductCreate};

    async fn seed(db: &DbService) -> (String, String, String) {
        let tree: NewCategoryNode = serde_json::from_value(serde_json::json!({
            "segment": "a", "name": "A",
            "children": [
                {"segment": "b", "name": "B"},
                {"segment": "c", "name": "C", "children": [
                    {"segment": "d", "name": "D"}
                ]}
            ]
        }))
        .unwrap();
        service::update_catalog(&db.pool, tree).await.unwrap();
        let leaf = service::find_by_path(&db.pool, "a/b").await.unwrap();
        let branch = service::find_by_path(&db.pool, "a/c").await.unwrap();
        let product = crate::db::repository::product::create(
            &db.pool,
            ProductCreate {
                sku: "W-1".into(),
                path: "widget".into(),
                name: "Widget".into(),
                data: None,
            },
        )
        .await
        .unwrap();
        (leaf.id, branch.id, product.id)
    }

    #[tokio::test]
    async fn attach_requires_leaf() {
        let db = DbService::new_in_memory().await.unwrap();
        let (leaf, branch, product) = seed(&db).await;

        let err = attach(
            &db.pool,
            ProductCategoryCreate {
                product_id: product.clone(),
                category_id: branch,
                priority: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::CategoryNotLeaf);

        let rel = attach(
            &db.pool,
            ProductCategoryCreate {
                product_id: product.clone(),
                category_id: leaf.clone(),
                priority: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(rel.category_id, leaf);

        // duplicate pair
        let err = attach(
            &db.pool,
            ProductCategoryCreate {
                product_id: product,
                category_id: leaf.clone(),
                priority: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductCategoryExists);

        // attached product shows up in the serialized catalog
        let tree = service::get_catalog(&db.pool).await.unwrap();
        let b = &tree.children[0];
        assert_eq!(b.products.as_ref().unwrap()[0].sku, "W-1");
    }

    #[tokio::test]
    async fn tree_replacement_is_gated_on_assocs() {
        let db = DbService::new_in_memory().await.unwrap();
        let (leaf, _, product) = seed(&db).await;
        attach(
            &db.pool,
            ProductCategoryCreate {
                product_id: product,
                category_id: leaf,
                priority: None,
            },
        )
        .await
        .unwrap();

        let single: NewCategoryNode =
            serde_json::from_value(serde_json::json!({"segment": "x", "name": "X"})).unwrap();
        let err = service::update_catalog(&db.pool, single).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AssocsExist);
        let err = service::delete_catalog(&db.pool).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AssocsExist);
    }

    #[tokio::test]
    async fn bulk_rewrite_reports_every_conflict() {
        let db = DbService::new_in_memory().await.unwrap();
        let (_, _, product) = seed(&db).await;

        let request = BulkRewrite {
            assignments: HashMap::from([
                ("a/zzz".to_string(), vec![product.clone()]),
                ("a/c".to_string(), vec![product.clone()]),
                ("a/b".to_string(), vec!["no-such-product".to_string()]),
            ]),
        };
        let conflict = bulk_rewrite(&db.pool, &request).await.unwrap().unwrap_err();
        assert_eq!(conflict.missing_paths, vec!["a/zzz"]);
        assert_eq!(conflict.non_leaf_paths, vec!["a/c"]);
        assert_eq!(conflict.missing_product_ids, vec!["no-such-product"]);

        // nothing was written
        let map = list_by_key(&db.pool, AssocKey::Path).await.unwrap();
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn bulk_rewrite_replaces_only_mentioned_paths() {
        let db = DbService::new_in_memory().await.unwrap();
        let (leaf_b, _, product) = seed(&db).await;
        attach(
            &db.pool,
            ProductCategoryCreate {
                product_id: product.clone(),
                category_id: leaf_b,
                priority: None,
            },
        )
        .await
        .unwrap();

        // rewrite only a/c/d; a/b keeps its relation
        let request = BulkRewrite {
            assignments: HashMap::from([("a/c/d".to_string(), vec![product.clone()])]),
        };
        bulk_rewrite(&db.pool, &request).await.unwrap().unwrap();

        let map = list_by_key(&db.pool, AssocKey::Path).await.unwrap();
        assert_eq!(map["a/b"].len(), 1);
        assert_eq!(map["a/c/d"].len(), 1);

        let by_id = list_by_key(&db.pool, AssocKey::Id).await.unwrap();
        assert_eq!(by_id.len(), 2);
    }
}
