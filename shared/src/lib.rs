//! Shared types for the booking platform
//!
//! Data models and API DTOs shared between booking-server and any client.
//! DB row types derive `sqlx::FromRow` behind the `db` feature so pure
//! clients don't pull in the database stack.

pub mod client;
pub mod models;
pub mod util;

pub use client::{LoginRequest, LoginResponse};
pub use models::*;
