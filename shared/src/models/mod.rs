//! Data models
//!
//! Shared between booking-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod reservation;
pub mod shop;
pub mod timeslot;
pub mod user;

// Re-exports
pub use reservation::*;
pub use shop::*;
pub use timeslot::*;
pub use user::*;
