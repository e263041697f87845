//! Shop API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Shop, ShopCreate, ShopUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text, validate_shop_schedule,
};
use crate::utils::{AppError, AppResult};

/// GET /api/shops - 获取所有营业中的店铺 (公开)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Shop>>> {
    let shops = repository::shop::find_all_active(&state.db.pool).await?;
    Ok(Json(shops))
}

/// GET /api/shops/{id} - 获取单个店铺
///
/// 停业店铺只对其管理员可见，其他人视为不存在。
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: Option<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Shop>> {
    let shop = repository::shop::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Shop {id} not found")))?;

    if !shop.is_active && !user.is_some_and(|u| u.manages_shop(id)) {
        return Err(AppError::not_found(format!("Shop {id} not found")));
    }

    Ok(Json(shop))
}

/// POST /api/shops - 创建店铺 (super_admin)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ShopCreate>,
) -> AppResult<Json<Shop>> {
    if !user.is_super_admin() {
        return Err(AppError::forbidden("Only super admin may create shops"));
    }

    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    // Schedule invariants on the effective values (payload or defaults)
    validate_shop_schedule(
        payload.opening_time.as_deref().unwrap_or("09:00"),
        payload.closing_time.as_deref().unwrap_or("18:00"),
        payload.slot_duration.unwrap_or(30),
        payload.max_capacity.unwrap_or(1),
    )?;

    let shop = repository::shop::create(&state.db.pool, payload).await?;
    tracing::info!(shop_id = shop.id, name = %shop.name, "Shop created");
    Ok(Json(shop))
}

/// PUT /api/shops/{id} - 更新店铺 (super_admin 或该店 shop_admin)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ShopUpdate>,
) -> AppResult<Json<Shop>> {
    if !user.manages_shop(id) {
        return Err(AppError::forbidden("Not an administrator of this shop"));
    }

    let existing = repository::shop::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Shop {id} not found")))?;

    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    // The merged schedule must still satisfy the invariants
    validate_shop_schedule(
        payload.opening_time.as_deref().unwrap_or(&existing.opening_time),
        payload.closing_time.as_deref().unwrap_or(&existing.closing_time),
        payload.slot_duration.unwrap_or(existing.slot_duration),
        payload.max_capacity.unwrap_or(existing.max_capacity),
    )?;

    let shop = repository::shop::update(&state.db.pool, id, payload).await?;
    tracing::info!(shop_id = id, "Shop updated");
    Ok(Json(shop))
}

/// DELETE /api/shops/{id} - 删除店铺 (super_admin, 预约级联删除)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !user.is_super_admin() {
        return Err(AppError::forbidden("Only super admin may delete shops"));
    }

    let deleted = repository::shop::delete(&state.db.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Shop {id} not found")));
    }
    tracing::info!(shop_id = id, "Shop deleted");
    Ok(Json(true))
}
