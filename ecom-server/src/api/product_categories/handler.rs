//! Product-category relation handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use shared::models::{AssocKey, AssocMap, BulkRewrite, ProductCategory, ProductCategoryCreate};
use shared::{ApiObject, ErrorCode};

use crate::catalog::assoc;
use crate::core::ServerState;
use crate::utils::validation::validate_uuid;
use crate::utils::{AppJson, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    key: Option<AssocKey>,
}

/// GET /api/product-categories?key=id|path
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiObject<AssocMap>>> {
    let key = query.key.unwrap_or(AssocKey::Id);
    let map = assoc::list_by_key(state.pool(), key).await?;
    Ok(Json(ApiObject::new("assoc-map", map)))
}

/// POST /api/product-categories — attach a product to a leaf category.
pub async fn attach(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<ProductCategoryCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<ProductCategory>>)> {
    validate_uuid(&payload.product_id, "product id")?;
    validate_uuid(&payload.category_id, "category id")?;
    let created = assoc::attach(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("product-category", created))))
}

/// DELETE /api/product-categories/{id}
pub async fn detach(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "relation id")?;
    assoc::detach(state.pool(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/product-categories — all-or-nothing bulk rewrite.
///
/// A refused batch answers 409 with the full conflict report so the caller
/// can fix every problem in one round trip.
pub async fn bulk_rewrite(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<BulkRewrite>,
) -> AppResult<Response> {
    match assoc::bulk_rewrite(state.pool(), &payload).await? {
        Ok(()) => Ok(StatusCode::OK.into_response()),
        Err(conflict) => {
            let code = ErrorCode::ProductCategoryConflict;
            let body = json!({
                "status": code.status(),
                "code": code.code(),
                "message": code.default_message(),
                "conflict": conflict,
            });
            Ok((StatusCode::CONFLICT, Json(body)).into_response())
        }
    }
}
