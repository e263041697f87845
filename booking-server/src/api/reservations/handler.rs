//! Reservation API Handlers
//!
//! 创建走 booking 引擎的准入检查，状态更新走转移守卫。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Reservation, ReservationCreate, ReservationUpdate};

use crate::auth::{CurrentUser, actor_of};
use crate::booking::{admission, transition};
use crate::booking::admission::AdmissionRequest;
use crate::core::ServerState;
use crate::db::repository;
use crate::utils::time::{parse_date, parse_time};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// 无过滤条件时 super_admin 看到的最近条数
const RECENT_LIMIT: i64 = 100;

#[derive(Deserialize)]
pub struct ReservationListQuery {
    pub shop_id: Option<i64>,
    pub date: Option<String>,
    pub user_id: Option<i64>,
}

/// GET /api/reservations - 按角色过滤的预约列表
///
/// - `shop_id[&date]`: 该店管理员或 super_admin
/// - `user_id`: 本人或管理员
/// - 无过滤: super_admin, 最近 100 条
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ReservationListQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    let pool = &state.db.pool;

    if let Some(shop_id) = query.shop_id {
        if !user.manages_shop(shop_id) {
            return Err(AppError::forbidden("Not an administrator of this shop"));
        }
        let reservations = match &query.date {
            Some(date) => {
                parse_date(date)?;
                repository::reservation::find_by_shop_date(pool, shop_id, date).await?
            }
            None => repository::reservation::find_by_shop(pool, shop_id).await?,
        };
        return Ok(Json(reservations));
    }

    if let Some(user_id) = query.user_id {
        if user_id != user.id && !user.role.is_admin() {
            return Err(AppError::forbidden("Not your reservations"));
        }
        let reservations = repository::reservation::find_by_user(pool, user_id).await?;
        return Ok(Json(reservations));
    }

    if !user.is_super_admin() {
        return Err(AppError::forbidden("A shop_id or user_id filter is required"));
    }
    let reservations = repository::reservation::find_recent(pool, RECENT_LIMIT).await?;
    Ok(Json(reservations))
}

/// GET /api/reservations/{id} - 本人、该店管理员或 super_admin
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let reservation = repository::reservation::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))?;

    let is_owner = reservation.user_id == Some(user.id);
    if !is_owner && !user.manages_shop(reservation.shop_id) {
        return Err(AppError::forbidden("No access to this reservation"));
    }

    Ok(Json(reservation))
}

/// POST /api/reservations - 预约准入 (可选登录)
///
/// 游客也可以预约；登录用户的预约会绑定其账号。
pub async fn create(
    State(state): State<ServerState>,
    user: Option<CurrentUser>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<Reservation>> {
    validate_required_text(&payload.customer_name, "customer_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.customer_phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.customer_email, "customer_email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let date = parse_date(&payload.reservation_date)?;
    let time = parse_time(&payload.reservation_time)?;
    let actor = actor_of(user.as_ref());

    let reservation = admission::admit(&state.db.pool, &actor, AdmissionRequest {
        shop_id: payload.shop_id,
        date,
        time,
        customer_name: payload.customer_name,
        customer_phone: payload.customer_phone,
        customer_email: payload.customer_email,
        notes: payload.notes,
        requested_status: payload.status,
    })
    .await?;

    Ok(Json(reservation))
}

/// PUT /api/reservations/{id} - 状态转移 / 备注更新
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<Reservation>> {
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let pool = &state.db.pool;
    let reservation = repository::reservation::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))?;

    // Absent status means "keep the current one" — a notes-only update
    let next = payload.status.unwrap_or(reservation.status);
    transition::authorize_transition(&user.actor(), &reservation, next)?;

    let updated = if next != reservation.status {
        let r = repository::reservation::update_status(pool, id, next, payload.notes.as_deref())
            .await?;
        tracing::info!(
            reservation_id = id,
            from = %reservation.status,
            to = %next,
            "Reservation status changed"
        );
        r
    } else if let Some(notes) = &payload.notes {
        repository::reservation::update_notes(pool, id, notes).await?
    } else {
        reservation
    };

    Ok(Json(updated))
}

/// DELETE /api/reservations/{id} - 物理删除 (super_admin)
///
/// 正常业务走取消转移；删除只用于数据清理。
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !user.is_super_admin() {
        return Err(AppError::forbidden("Only super admin may delete reservations"));
    }

    let deleted = repository::reservation::delete(&state.db.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Reservation {id} not found")));
    }
    tracing::info!(reservation_id = id, "Reservation deleted");
    Ok(Json(true))
}
