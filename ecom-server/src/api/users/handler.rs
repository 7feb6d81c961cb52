//! User API handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use shared::models::{User, UserAddress, UserAddressCreate, UserAddressUpdate, UserCreate, UserUpdate};
use shared::{ApiObject, ListResponse};

use crate::auth::{CurrentUser, ensure_owner};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, validate_country_code, validate_required_text, validate_uuid,
};
use crate::utils::{AppJson, AppResult};

/// GET /api/users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ListResponse<User>>> {
    let users = user::find_all(state.pool()).await?;
    Ok(Json(ListResponse::new(users)))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiObject<User>>> {
    validate_uuid(&id, "user id")?;
    ensure_owner(&current, Some(&id))?;
    let found = user::find_by_id(state.pool(), &id)
        .await?
        .ok_or(shared::ErrorCode::UserNotFound)?;
    Ok(Json(ApiObject::new("user", found)))
}

/// POST /api/users
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<UserCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<User>>)> {
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let created = user::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("user", created))))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UserUpdate>,
) -> AppResult<Json<ApiObject<User>>> {
    validate_uuid(&id, "user id")?;
    if let Some(email) = &payload.email {
        validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    }
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    let updated = user::update(state.pool(), &id, payload).await?;
    Ok(Json(ApiObject::new("user", updated)))
}

/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "user id")?;
    user::delete(state.pool(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn validate_address_fields(
    recipient_name: Option<&str>,
    street: Option<&str>,
    city: Option<&str>,
    postal_code: Option<&str>,
    country_code: Option<&str>,
) -> AppResult<()> {
    use crate::utils::validation::{MAX_ADDRESS_LEN, MAX_SHORT_TEXT_LEN};
    if let Some(v) = recipient_name {
        validate_required_text(v, "recipient_name", MAX_NAME_LEN)?;
    }
    if let Some(v) = street {
        validate_required_text(v, "street", MAX_ADDRESS_LEN)?;
    }
    if let Some(v) = city {
        validate_required_text(v, "city", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(v) = postal_code {
        validate_required_text(v, "postal_code", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(v) = country_code {
        validate_country_code(v)?;
    }
    Ok(())
}

/// GET /api/users/{id}/addresses
pub async fn list_addresses(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ListResponse<UserAddress>>> {
    validate_uuid(&id, "user id")?;
    ensure_owner(&current, Some(&id))?;
    let addresses = user::find_addresses(state.pool(), &id).await?;
    Ok(Json(ListResponse::new(addresses)))
}

/// POST /api/users/{id}/addresses
pub async fn create_address(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UserAddressCreate>,
) -> AppResult<(StatusCode, Json<ApiObject<UserAddress>>)> {
    validate_uuid(&id, "user id")?;
    ensure_owner(&current, Some(&id))?;
    validate_address_fields(
        Some(&payload.recipient_name),
        Some(&payload.street),
        Some(&payload.city),
        Some(&payload.postal_code),
        Some(&payload.country_code),
    )?;
    let created = user::create_address(state.pool(), &id, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiObject::new("address", created))))
}

/// PUT /api/users/{id}/addresses/{address_id}
pub async fn update_address(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path((id, address_id)): Path<(String, String)>,
    AppJson(payload): AppJson<UserAddressUpdate>,
) -> AppResult<Json<ApiObject<UserAddress>>> {
    validate_uuid(&id, "user id")?;
    validate_uuid(&address_id, "address id")?;
    ensure_owner(&current, Some(&id))?;
    validate_address_fields(
        payload.recipient_name.as_deref(),
        payload.street.as_deref(),
        payload.city.as_deref(),
        payload.postal_code.as_deref(),
        payload.country_code.as_deref(),
    )?;
    let updated = user::update_address(state.pool(), &id, &address_id, payload).await?;
    Ok(Json(ApiObject::new("address", updated)))
}

/// DELETE /api/users/{id}/addresses/{address_id}
pub async fn delete_address(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path((id, address_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    validate_uuid(&id, "user id")?;
    validate_uuid(&address_id, "address id")?;
    ensure_owner(&current, Some(&id))?;
    user::delete_address(state.pool(), &id, &address_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
