//! Product group handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{
    ProductGroup, ProductGroupCreate, ProductGroupMember, ProductGroupMemberCreate,
    ProductGroupUpdate, ProductRef,
};
use shared::{ApiObject, ListResponse};

use crate::core::ServerState;
use crate::db::repository::{product, product_group};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text, validate_uuid,
};
use crate::utils::{AppJson, AppResult};

/// GET /api/product-groups
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ListResponse<ProductGroup>>> {
    let groups = product_group::find_all(state.pool()).await?;
    Ok(Json(ListResponse::new(groups)))
}

/// GET /api/product-groups/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiObject<ProductGroup>>> {
    validate_uuid(&id, "group id")?;
    let found = product_group::find_by_id(state.pool(), &id)
        .await?
        .ok_or(shared::ErrorCode::ProductGroupNotFound)?;
    Ok(Json(ApiObject::new("product-group", found)))
}

/// POST /api/product-groups
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<ProductGroupCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<ProductGroup>>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.kind, "kind", MAX_SHORT_TEXT_LEN)?;
    let created = product_group::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("product-group", created))))
}

/// PUT /api/product-groups/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ProductGroupUpdate>,
) -> AppResult<Json<ApiObject<ProductGroup>>> {
    validate_uuid(&id, "group id")?;
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(kind) = &payload.kind {
        validate_required_text(kind, "kind", MAX_SHORT_TEXT_LEN)?;
    }
    let updated = product_group::update(state.pool(), &id, payload).await?;
    Ok(Json(ApiObject::new("product-group", updated)))
}

/// DELETE /api/product-groups/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "group id")?;
    product_group::delete(state.pool(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/product-groups/{id}/members — member product snapshots.
pub async fn list_members(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ListResponse<ProductRef>>> {
    validate_uuid(&id, "group id")?;
    if product_group::find_by_id(state.pool(), &id).await?.is_none() {
        return Err(shared::ErrorCode::ProductGroupNotFound.into());
    }
    let members = product_group::member_products(state.pool(), &id).await?;
    Ok(Json(ListResponse::new(members)))
}

/// POST /api/product-groups/{id}/members
pub async fn add_member(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ProductGroupMemberCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<ProductGroupMember>>)> {
    validate_uuid(&id, "group id")?;
    validate_uuid(&payload.product_id, "product id")?;
    if product_group::find_by_id(state.pool(), &id).await?.is_none() {
        return Err(shared::ErrorCode::ProductGroupNotFound.into());
    }
    if product::find_by_id(state.pool(), &payload.product_id)
        .await?
        .is_none()
    {
        return Err(shared::ErrorCode::ProductNotFound.into());
    }
    let created = product_group::add_member(state.pool(), &id, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("group-member", created))))
}

/// DELETE /api/product-groups/{id}/members/{product_id}
pub async fn remove_member(
    State(state): State<ServerState>,
    Path((id, product_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "group id")?;
    validate_uuid(&product_id, "product id")?;
    product_group::remove_member(state.pool(), &id, &product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
