//! Reservation Model

use serde::{Deserialize, Serialize};

/// Reservation lifecycle state
///
/// ```text
/// pending ──→ confirmed ──→ completed
///    │            │
///    └────────────┴───────→ cancelled
/// ```
///
/// `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether this state has no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Edge check of the lifecycle graph
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Completed)
                | (Self::Confirmed, Self::Cancelled)
        )
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation entity
///
/// `slot_seq` is the reservation's position within its slot's capacity
/// (`0..max_capacity`). A partial unique index over
/// `(shop_id, reservation_date, reservation_time, slot_seq)` on
/// non-cancelled rows turns concurrent overbooking into a constraint
/// violation instead of a silent capacity overshoot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub shop_id: i64,
    pub user_id: Option<i64>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    /// Calendar date, `YYYY-MM-DD`
    pub reservation_date: String,
    /// Time of day, `HH:MM`
    pub reservation_time: String,
    #[serde(default)]
    pub slot_seq: i64,
    pub status: ReservationStatus,
    pub notes: Option<String>,
    /// Unix millis
    pub created_at: i64,
    /// Joined from shop (not a reservation column)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "db", sqlx(default))]
    pub shop_name: Option<String>,
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub shop_id: i64,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub reservation_date: String,
    pub reservation_time: String,
    pub notes: Option<String>,
    /// Honored only for shop/super administrators; everyone else gets `pending`
    pub status: Option<ReservationStatus>,
}

/// Update reservation payload (status transition and/or notes)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationUpdate {
    pub status: Option<ReservationStatus>,
    pub notes: Option<String>,
}
