//! User API Handlers (账号管理)
//!
//! 管理员账号由 super_admin 创建，初始密码随机生成且只返回一次。

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{
    ChangePasswordRequest, PasswordReset, Role, UserCreate, UserCreated, UserResponse,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{self, user::NewUser};
use crate::utils::password::{GENERATED_PASSWORD_LEN, generate_password, hash_password, verify_password};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_password, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// GET /api/users - 账号列表 (super_admin)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<UserResponse>>> {
    if !user.is_super_admin() {
        return Err(AppError::forbidden("Only super admin may list accounts"));
    }
    let users = repository::user::list_all(&state.db.pool).await?;
    Ok(Json(users))
}

/// POST /api/users - 创建管理员账号 (super_admin)
///
/// 返回的 `password` 字段只出现这一次，之后不可恢复。
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserCreated>> {
    if !user.is_super_admin() {
        return Err(AppError::forbidden("Only super admin may create accounts"));
    }

    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    // shop_admin accounts must be bound to an existing shop
    if payload.role == Role::ShopAdmin {
        let shop_id = payload
            .shop_id
            .ok_or_else(|| AppError::validation("shop_admin requires a shop_id"))?;
        repository::shop::find_by_id(&state.db.pool, shop_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Shop {shop_id} not found")))?;
    }

    let password = generate_password(GENERATED_PASSWORD_LEN);
    let hash = hash_password(&password)?;

    let created = repository::user::create(&state.db.pool, NewUser {
        name: &payload.name,
        email: Some(&payload.email),
        phone: payload.phone.as_deref(),
        password_hash: Some(&hash),
        role: payload.role,
        shop_id: payload.shop_id,
    })
    .await?;

    tracing::info!(user_id = created.id, role = %created.role, "Account created");

    Ok(Json(UserCreated {
        user: created.into(),
        password: Some(password),
    }))
}

/// POST /api/users/{id}/reset-password - 重置密码 (super_admin)
pub async fn reset_password(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<PasswordReset>> {
    if !user.is_super_admin() {
        return Err(AppError::forbidden("Only super admin may reset passwords"));
    }

    repository::user::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;

    let password = generate_password(GENERATED_PASSWORD_LEN);
    let hash = hash_password(&password)?;
    repository::user::set_password_hash(&state.db.pool, id, &hash).await?;

    tracing::info!(user_id = id, "Password reset");

    Ok(Json(PasswordReset {
        user_id: id,
        password,
    }))
}

/// POST /api/users/change-password - 本人修改密码
pub async fn change_password(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<Json<bool>> {
    validate_password(&payload.new_password)?;

    let account = repository::user::find_by_id(&state.db.pool, user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;

    let hash = account
        .password_hash
        .as_deref()
        .ok_or_else(AppError::invalid_credentials)?;
    if !verify_password(&payload.current_password, hash)? {
        return Err(AppError::invalid_credentials());
    }

    let new_hash = hash_password(&payload.new_password)?;
    repository::user::set_password_hash(&state.db.pool, user.id, &new_hash).await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(Json(true))
}
