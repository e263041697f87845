//! Booking engine
//!
//! The slot-availability and booking-admission core:
//!
//! - [`slots`] - 时段序列生成 (营业时间 × 时段长度)
//! - [`availability`] - 时段占用合并 (生成序列 × 预约计数)
//! - [`admission`] - 预约准入检查 (营业时间 + 容量)
//! - [`transition`] - 预约状态机 + 角色策略
//!
//! The engine never reads ambient session state: every entry point takes an
//! explicit [`Actor`], so the whole module is testable without the HTTP
//! layer.

pub mod admission;
pub mod availability;
pub mod slots;
pub mod transition;

use shared::models::ReservationStatus;
use thiserror::Error;

use crate::db::repository::RepoError;

/// The authenticated (or anonymous) party a booking operation runs for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// No session — guests may book, nothing else
    Guest,
    Customer {
        user_id: i64,
    },
    /// Bound to one shop
    ShopAdmin {
        user_id: i64,
        shop_id: i64,
    },
    SuperAdmin {
        user_id: i64,
    },
}

impl Actor {
    pub fn user_id(&self) -> Option<i64> {
        match self {
            Actor::Guest => None,
            Actor::Customer { user_id }
            | Actor::ShopAdmin { user_id, .. }
            | Actor::SuperAdmin { user_id } => Some(*user_id),
        }
    }

    /// May administer the given shop's schedule and reservations
    pub fn manages_shop(&self, shop: i64) -> bool {
        match self {
            Actor::SuperAdmin { .. } => true,
            Actor::ShopAdmin { shop_id, .. } => *shop_id == shop,
            _ => false,
        }
    }
}

/// Booking engine failures — all client-correctable except `InvalidSchedule`
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Shop {0} not found")]
    ShopNotFound(i64),

    #[error("Reservation {0} not found")]
    ReservationNotFound(i64),

    #[error("Requested time {time} is outside business hours ({opening}-{closing})")]
    OutsideBusinessHours {
        time: String,
        opening: String,
        closing: String,
    },

    #[error("Time slot {0} is fully booked")]
    SlotFull(String),

    #[error("Illegal status transition: {from} -> {to}")]
    IllegalTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error("{0}")]
    Denied(&'static str),

    /// Stored open/close strings failed to parse — data fault, not the caller's
    #[error("Shop {0} has an invalid schedule configuration")]
    InvalidSchedule(i64),

    #[error(transparent)]
    Repo(#[from] RepoError),
}
