//! Category API handlers
//!
//! The catalog tree is replaced as a whole document; there is no node-level
//! mutation surface.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Category, CategoryTreeNode, NewCategoryNode};
use shared::ApiObject;

use crate::catalog::service;
use crate::core::ServerState;
use crate::db::repository::category_tree;
use crate::utils::validation::validate_uuid;
use crate::utils::{AppJson, AppResult};

/// GET /api/categories — the whole catalog tree.
pub async fn get_tree(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiObject<CategoryTreeNode>>> {
    let tree = service::get_catalog(state.pool()).await?;
    Ok(Json(ApiObject::new("category-tree", tree)))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiObject<Category>>> {
    validate_uuid(&id, "category id")?;
    let found = category_tree::find_by_id(state.pool(), &id)
        .await?
        .ok_or(shared::ErrorCode::CategoryNotFound)?;
    Ok(Json(ApiObject::new("category", found)))
}

/// GET /api/categories/path/{*path}
pub async fn get_by_path(
    State(state): State<ServerState>,
    Path(path): Path<String>,
) -> AppResult<Json<ApiObject<Category>>> {
    let found = service::find_by_path(state.pool(), &path).await?;
    Ok(Json(ApiObject::new("category", found)))
}

/// PUT /api/categories — whole-tree replacement.
pub async fn replace_tree(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<NewCategoryNode>,
) -> AppResult<StatusCode> {
    service::update_catalog(state.pool(), payload).await?;
    Ok(StatusCode::OK)
}

/// DELETE /api/categories — purge the tree (refused while relations exist).
pub async fn purge(State(state): State<ServerState>) -> AppResult<StatusCode> {
    service::delete_catalog(state.pool()).await?;
    Ok(StatusCode::NO_CONTENT)
}
