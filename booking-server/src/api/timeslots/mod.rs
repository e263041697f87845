//! 时段可用性路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/timeslots?shop_id&date | GET | 某店某日的时段视图 | 无 |

use std::collections::HashMap;

use axum::{Json, Router, extract::Query, extract::State, routing::get};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use shared::models::TimeSlot;

use crate::booking::{availability, slots};
use crate::core::ServerState;
use crate::db::repository;
use crate::utils::time::{format_date, parse_date, parse_time, today};
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/timeslots", get(timeslots))
}

#[derive(Deserialize)]
pub struct TimeSlotsQuery {
    pub shop_id: i64,
    /// `YYYY-MM-DD`; 缺省为营业时区的今天
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct TimeSlotsResponse {
    pub shop_id: i64,
    pub date: String,
    pub slots: Vec<TimeSlot>,
}

/// GET /api/timeslots - 可用性视图
///
/// 生成的时段序列与该 (店, 日) 的非取消预约计数合并；
/// 不在序列上的历史预约不会被合成进视图。
async fn timeslots(
    State(state): State<ServerState>,
    Query(query): Query<TimeSlotsQuery>,
) -> AppResult<Json<TimeSlotsResponse>> {
    let date = match &query.date {
        Some(d) => parse_date(d)?,
        None => today(state.config.business_timezone),
    };

    let shop = repository::shop::find_by_id(&state.db.pool, query.shop_id)
        .await?
        .filter(|s| s.is_active)
        .ok_or_else(|| AppError::not_found(format!("Shop {} not found", query.shop_id)))?;

    let opening = parse_time(&shop.opening_time)?;
    let closing = parse_time(&shop.closing_time)?;
    let sequence = slots::generate_slots(opening, closing, shop.slot_duration);

    let date_str = format_date(date);
    let counts: HashMap<NaiveTime, i64> =
        repository::reservation::counts_by_time(&state.db.pool, shop.id, &date_str)
            .await?
            .into_iter()
            // Unparseable stored times cannot match any generated slot anyway
            .filter_map(|(time, count)| parse_time(&time).ok().map(|t| (t, count)))
            .collect();

    let slots = availability::build_time_slots(&sequence, &counts, shop.max_capacity);

    Ok(Json(TimeSlotsResponse {
        shop_id: shop.id,
        date: date_str,
        slots,
    }))
}
