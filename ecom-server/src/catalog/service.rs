//! Category engine
//!
//! Whole-tree replacement, catalog serialization and path lookup. The only
//! mutation the tree supports is replacement, gated on the absence of
//! product-category associations.

use shared::ErrorCode;
use shared::models::{Category, CategoryTreeNode, NewCategoryNode, ProductRef};
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::catalog::tree;
use crate::db::repository::{category_tree, product_category};
use crate::utils::{AppError, AppResult};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};

pub async fn has_catalog(pool: &SqlitePool) -> AppResult<bool> {
    Ok(!category_tree::is_empty(pool).await?)
}

/// Replace the whole catalog tree.
pub async fn update_catalog(pool: &SqlitePool, input: NewCategoryNode) -> AppResult<()> {
    validate_tree(&input)?;
    let rows = tree::flatten(&input);
    category_tree::batch_replace(pool, &rows).await?;
    tracing::info!(categories = rows.len(), "catalog replaced");
    Ok(())
}

/// Serialize the catalog: nested set joined with product associations.
pub async fn get_catalog(pool: &SqlitePool) -> AppResult<CategoryTreeNode> {
    let rows = category_tree::load_ordered(pool).await?;
    if rows.is_empty() {
        return Err(ErrorCode::CategoriesEmpty.into());
    }
    let assoc = assoc_by_category(pool).await?;
    tree::build(&rows, &assoc)
}

/// Resolve a category by its slash-joined path.
pub async fn find_by_path(pool: &SqlitePool, path: &str) -> AppResult<Category> {
    category_tree::find_by_path(pool, path)
        .await?
        .ok_or_else(|| ErrorCode::CategoryNotFound.into())
}

/// Purge the tree; refused while associations exist.
pub async fn delete_catalog(pool: &SqlitePool) -> AppResult<()> {
    category_tree::purge(pool).await?;
    tracing::info!("catalog deleted");
    Ok(())
}

async fn assoc_by_category(pool: &SqlitePool) -> AppResult<HashMap<String, Vec<ProductRef>>> {
    let pairs = product_category::all_with_products(pool).await?;
    let mut map: HashMap<String, Vec<ProductRef>> = HashMap::new();
    for (category_id, product) in pairs {
        map.entry(category_id).or_default().push(product);
    }
    Ok(map)
}

fn validate_tree(node: &NewCategoryNode) -> AppResult<()> {
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        validate_required_text(&node.segment, "segment", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&node.name, "name", MAX_NAME_LEN)?;
        if !node
            .segment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(AppError::bad_request(format!(
                "segment '{}' must match [a-z0-9-]",
                node.segment
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for child in &node.children {
            if !seen.insert(child.segment.as_str()) {
                return Err(AppError::bad_request(format!(
                    "duplicate sibling segment '{}'",
                    child.segment
                )));
            }
            stack.push(child);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn tree_fixture() -> NewCategoryNode {
        serde_json::from_value(serde_json::json!({
            "segment": "a", "name": "A",
            "children": [
                {"segment": "b", "name": "B"},
                {"segment": "c", "name": "C", "children": [
                    {"segment": "d", "name": "D"}
                ]}
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn replace_then_read_back() {
        let db = DbService::new_in_memory().await.unwrap();
        assert!(!has_catalog(&db.pool).await.unwrap());

        update_catalog(&db.pool, tree_fixture()).await.unwrap();
        assert!(has_catalog(&db.pool).await.unwrap());

        let tree = get_catalog(&db.pool).await.unwrap();
        assert_eq!(tree.path, "a");
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[1].children[0].path, "a/c/d");

        let c = find_by_path(&db.pool, "a/c").await.unwrap();
        assert!(!c.is_leaf());
        let err = find_by_path(&db.pool, "a/missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CategoryNotFound);
    }

    #[tokio::test]
    async fn empty_catalog_reports_categories_empty() {
        let db = DbService::new_in_memory().await.unwrap();
        let err = get_catalog(&db.pool).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CategoriesEmpty);
    }

    #[tokio::test]
    async fn delete_then_catalog_is_empty_again() {
        let db = DbService::new_in_memory().await.unwrap();
        update_catalog(&db.pool, tree_fixture()).await.unwrap();
        delete_catalog(&db.pool).await.unwrap();
        let err = get_catalog(&db.pool).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CategoriesEmpty);
    }

    #[tokio::test]
    async fn rejects_bad_segments() {
        let db = DbService::new_in_memory().await.unwrap();
        let bad: NewCategoryNode = serde_json::from_value(serde_json::json!({
            "segment": "Has Space", "name": "X"
        }))
        .unwrap();
        let err = update_catalog(&db.pool, bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
    }

    #[tokio::test]
    async fn rejects_duplicate_sibling_segments() {
        let db = DbService::new_in_memory().await.unwrap();
        let bad: NewCategoryNode = serde_json::from_value(serde_json::json!({
            "segment": "a", "name": "A",
            "children": [
                {"segment": "b", "name": "B1"},
                {"segment": "b", "name": "B2"}
            ]
        }))
        .unwrap();
        let err = update_catalog(&db.pool, bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
    }
}
