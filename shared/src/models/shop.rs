//! Shop Model

use serde::{Deserialize, Serialize};

/// Shop entity (预约店铺：营业时间 + 时段配置)
///
/// `opening_time` / `closing_time` are wall-clock `HH:MM` strings with no
/// timezone attached; the whole system runs in one fixed business timezone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Shop {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub opening_time: String,
    pub closing_time: String,
    /// Slot stride in minutes (> 0)
    pub slot_duration: i64,
    /// Max concurrent non-cancelled reservations per slot (>= 1)
    pub max_capacity: i64,
    pub is_active: bool,
    /// Unix millis
    pub created_at: i64,
}

/// Create shop payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopCreate {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Defaults to "09:00"
    pub opening_time: Option<String>,
    /// Defaults to "18:00"
    pub closing_time: Option<String>,
    /// Defaults to 30
    pub slot_duration: Option<i64>,
    /// Defaults to 1
    pub max_capacity: Option<i64>,
}

/// Update shop payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub slot_duration: Option<i64>,
    pub max_capacity: Option<i64>,
    pub is_active: Option<bool>,
}
