//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查接口
//! - [`auth`] - 认证相关接口
//! - [`shops`] - 店铺管理接口
//! - [`timeslots`] - 时段可用性接口
//! - [`reservations`] - 预约管理接口
//! - [`users`] - 账号管理接口
//! - [`profile`] - 个人资料接口

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::ServerState;

pub mod auth;
pub mod health;
pub mod profile;
pub mod reservations;
pub mod shops;
pub mod timeslots;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Build the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(shops::router())
        .merge(timeslots::router())
        .merge(reservations::router())
        .merge(users::router())
        .merge(profile::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
