//! Booking admission check
//!
//! The state-transition guard at reservation-creation time. In order:
//!
//! 1. shop must exist and be active (inactive reads as not-found);
//! 2. requested time must lie in `[open, close)` — checked against the
//!    business hours only, not the generated slot grid;
//! 3. the (shop, date, time) bucket must have a free capacity sequence;
//! 4. persist as `pending`, or with the admin-supplied status when the
//!    actor administers the shop.
//!
//! The capacity check is not check-then-act: each live reservation holds a
//! `slot_seq` in `[0, max_capacity)` under a partial unique index, so two
//! racing admissions cannot both take the last seat — the loser gets a
//! unique violation and retries against the fresh state.

use chrono::{NaiveDate, NaiveTime};
use shared::models::{Reservation, ReservationStatus, Shop};
use sqlx::SqlitePool;

use super::{Actor, BookingError};
use crate::db::repository::{self, RepoError, reservation::NewReservation};

/// Bounded retries when racing for a slot sequence
const MAX_SEQ_RETRIES: usize = 3;

/// Admission input (times already parsed by the caller)
#[derive(Debug, Clone)]
pub struct AdmissionRequest {
    pub shop_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub notes: Option<String>,
    /// Honored only for administrators of the shop
    pub requested_status: Option<ReservationStatus>,
}

/// Parse a stored `HH:MM` wall-clock string
fn parse_stored_time(s: &str, shop_id: i64) -> Result<NaiveTime, BookingError> {
    let hhmm = s.get(..5).unwrap_or(s);
    NaiveTime::parse_from_str(hhmm, "%H:%M").map_err(|_| BookingError::InvalidSchedule(shop_id))
}

/// Business-hours check: inclusive at open, exclusive at close.
pub fn check_business_hours(shop: &Shop, time: NaiveTime) -> Result<(), BookingError> {
    let opening = parse_stored_time(&shop.opening_time, shop.id)?;
    let closing = parse_stored_time(&shop.closing_time, shop.id)?;
    if time < opening || time >= closing {
        return Err(BookingError::OutsideBusinessHours {
            time: time.format("%H:%M").to_string(),
            opening: shop.opening_time.clone(),
            closing: shop.closing_time.clone(),
        });
    }
    Ok(())
}

/// Status the reservation is admitted with.
///
/// Administrators of the shop may supply one (deserialization already
/// limited it to the legal enum); everyone else gets `pending`.
pub fn admitted_status(
    actor: &Actor,
    shop_id: i64,
    requested: Option<ReservationStatus>,
) -> ReservationStatus {
    match requested {
        Some(status) if actor.manages_shop(shop_id) => status,
        _ => ReservationStatus::Pending,
    }
}

/// Run the full admission check and persist the reservation.
pub async fn admit(
    pool: &SqlitePool,
    actor: &Actor,
    req: AdmissionRequest,
) -> Result<Reservation, BookingError> {
    let shop = repository::shop::find_by_id(pool, req.shop_id)
        .await?
        .filter(|s| s.is_active)
        .ok_or(BookingError::ShopNotFound(req.shop_id))?;

    check_business_hours(&shop, req.time)?;

    let status = admitted_status(actor, shop.id, req.requested_status);
    let date = req.date.format("%Y-%m-%d").to_string();
    let time = req.time.format("%H:%M").to_string();

    for _ in 0..MAX_SEQ_RETRIES {
        let taken =
            repository::reservation::active_slot_seqs(pool, shop.id, &date, &time).await?;
        if taken.len() as i64 >= shop.max_capacity {
            return Err(BookingError::SlotFull(time));
        }

        // Lowest free sequence below capacity; one exists since len < capacity
        let slot_seq = (0..shop.max_capacity)
            .find(|seq| !taken.contains(seq))
            .unwrap_or(shop.max_capacity - 1);

        let inserted = repository::reservation::insert(pool, NewReservation {
            shop_id: shop.id,
            user_id: actor.user_id(),
            customer_name: &req.customer_name,
            customer_phone: req.customer_phone.as_deref(),
            customer_email: req.customer_email.as_deref(),
            reservation_date: &date,
            reservation_time: &time,
            slot_seq,
            status,
            notes: req.notes.as_deref(),
        })
        .await;

        match inserted {
            Ok(reservation) => {
                tracing::info!(
                    reservation_id = reservation.id,
                    shop_id = shop.id,
                    date = %date,
                    time = %time,
                    status = %status,
                    "Reservation admitted"
                );
                return Ok(reservation);
            }
            // A racer took this seq between the read and the insert
            Err(RepoError::Duplicate(_)) => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(BookingError::SlotFull(time))
}
