//! Profile API Handlers

use axum::{Json, extract::State};
use shared::models::{ProfileUpdate, UserResponse};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// GET /api/profile - 本人资料
pub async fn get_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UserResponse>> {
    let account = repository::user::find_by_id(&state.db.pool, user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;
    Ok(Json(account.into()))
}

/// PUT /api/profile - 更新本人资料 (姓名/邮箱/电话)
pub async fn update_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<UserResponse>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let updated = repository::user::update_profile(&state.db.pool, user.id, payload).await?;
    tracing::info!(user_id = user.id, "Profile updated");
    Ok(Json(updated.into()))
}
