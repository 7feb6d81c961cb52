//! Product API handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Product, ProductCreate, ProductImage, ProductImageCreate, ProductUpdate};
use shared::{ApiObject, ListResponse};

use crate::core::ServerState;
use crate::db::repository::{product, product_image};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_required_text, validate_uuid,
};
use crate::utils::{AppJson, AppResult};

/// GET /api/products
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ListResponse<Product>>> {
    let products = product::find_all(state.pool()).await?;
    Ok(Json(ListResponse::new(products)))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiObject<Product>>> {
    validate_uuid(&id, "product id")?;
    let found = product::find_by_id(state.pool(), &id)
        .await?
        .ok_or(shared::ErrorCode::ProductNotFound)?;
    Ok(Json(ApiObject::new("product", found)))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<ProductCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<Product>>)> {
    validate_required_text(&payload.sku, "sku", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.path, "path", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let created = product::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("product", created))))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ProductUpdate>,
) -> AppResult<Json<ApiObject<Product>>> {
    validate_uuid(&id, "product id")?;
    if let Some(sku) = &payload.sku {
        validate_required_text(sku, "sku", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(path) = &payload.path {
        validate_required_text(path, "path", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    let updated = product::update(state.pool(), &id, payload).await?;
    Ok(Json(ApiObject::new("product", updated)))
}

/// DELETE /api/products/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "product id")?;
    product::delete(state.pool(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/products/{id}/images
pub async fn list_images(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ListResponse<ProductImage>>> {
    validate_uuid(&id, "product id")?;
    if product::find_by_id(state.pool(), &id).await?.is_none() {
        return Err(shared::ErrorCode::ProductNotFound.into());
    }
    let images = product_image::find_by_product(state.pool(), &id).await?;
    Ok(Json(ListResponse::new(images)))
}

/// POST /api/products/{id}/images
pub async fn create_image(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ProductImageCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<ProductImage>>)> {
    validate_uuid(&id, "product id")?;
    validate_required_text(&payload.url, "url", MAX_URL_LEN)?;
    if product::find_by_id(state.pool(), &id).await?.is_none() {
        return Err(shared::ErrorCode::ProductNotFound.into());
    }
    let created = product_image::create(state.pool(), &id, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("image", created))))
}

/// DELETE /api/products/{id}/images/{image_id}
pub async fn delete_image(
    State(state): State<ServerState>,
    Path((id, image_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "product id")?;
    validate_uuid(&image_id, "image id")?;
    product_image::delete(state.pool(), &id, &image_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
