//! Reservation Repository
//!
//! All list queries join the shop name (the clients render it everywhere).
//! `insert` relies on the partial unique index over
//! `(shop_id, reservation_date, reservation_time, slot_seq)` — a concurrent
//! duplicate surfaces as [`RepoError::Duplicate`], which the admission loop
//! in `booking::admission` treats as "seq taken, retry".

use shared::models::{Reservation, ReservationStatus};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const JOINED: &str = "r.id, r.shop_id, r.user_id, r.customer_name, r.customer_phone, \
                      r.customer_email, r.reservation_date, r.reservation_time, r.slot_seq, \
                      r.status, r.notes, r.created_at, s.name AS shop_name";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Reservation>> {
    let reservation = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {JOINED} FROM reservation r JOIN shop s ON r.shop_id = s.id WHERE r.id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(reservation)
}

pub async fn find_by_shop_date(
    pool: &SqlitePool,
    shop_id: i64,
    date: &str,
) -> RepoResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {JOINED} FROM reservation r JOIN shop s ON r.shop_id = s.id \
         WHERE r.shop_id = ? AND r.reservation_date = ? ORDER BY r.reservation_time"
    ))
    .bind(shop_id)
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(reservations)
}

pub async fn find_by_shop(pool: &SqlitePool, shop_id: i64) -> RepoResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {JOINED} FROM reservation r JOIN shop s ON r.shop_id = s.id \
         WHERE r.shop_id = ? ORDER BY r.reservation_date DESC, r.reservation_time"
    ))
    .bind(shop_id)
    .fetch_all(pool)
    .await?;
    Ok(reservations)
}

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {JOINED} FROM reservation r JOIN shop s ON r.shop_id = s.id \
         WHERE r.user_id = ? ORDER BY r.reservation_date DESC, r.reservation_time"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(reservations)
}

pub async fn find_recent(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {JOINED} FROM reservation r JOIN shop s ON r.shop_id = s.id \
         ORDER BY r.reservation_date DESC, r.reservation_time LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(reservations)
}

/// Non-cancelled reservation counts per time for one (shop, date)
pub async fn counts_by_time(
    pool: &SqlitePool,
    shop_id: i64,
    date: &str,
) -> RepoResult<Vec<(String, i64)>> {
    let counts = sqlx::query_as::<_, (String, i64)>(
        "SELECT reservation_time, COUNT(*) FROM reservation \
         WHERE shop_id = ? AND reservation_date = ? AND status != 'cancelled' \
         GROUP BY reservation_time",
    )
    .bind(shop_id)
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(counts)
}

/// Slot sequences currently held by non-cancelled reservations in one bucket
pub async fn active_slot_seqs(
    pool: &SqlitePool,
    shop_id: i64,
    date: &str,
    time: &str,
) -> RepoResult<Vec<i64>> {
    let seqs = sqlx::query_scalar::<_, i64>(
        "SELECT slot_seq FROM reservation \
         WHERE shop_id = ? AND reservation_date = ? AND reservation_time = ? \
         AND status != 'cancelled' ORDER BY slot_seq",
    )
    .bind(shop_id)
    .bind(date)
    .bind(time)
    .fetch_all(pool)
    .await?;
    Ok(seqs)
}

/// Insert parameters for a new reservation
pub struct NewReservation<'a> {
    pub shop_id: i64,
    pub user_id: Option<i64>,
    pub customer_name: &'a str,
    pub customer_phone: Option<&'a str>,
    pub customer_email: Option<&'a str>,
    pub reservation_date: &'a str,
    pub reservation_time: &'a str,
    pub slot_seq: i64,
    pub status: ReservationStatus,
    pub notes: Option<&'a str>,
}

pub async fn insert(pool: &SqlitePool, new: NewReservation<'_>) -> RepoResult<Reservation> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO reservation (shop_id, user_id, customer_name, customer_phone, \
         customer_email, reservation_date, reservation_time, slot_seq, status, notes, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(new.shop_id)
    .bind(new.user_id)
    .bind(new.customer_name)
    .bind(new.customer_phone)
    .bind(new.customer_email)
    .bind(new.reservation_date)
    .bind(new.reservation_time)
    .bind(new.slot_seq)
    .bind(new.status)
    .bind(new.notes)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create reservation".into()))
}

pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: ReservationStatus,
    notes: Option<&str>,
) -> RepoResult<Reservation> {
    let rows = sqlx::query(
        "UPDATE reservation SET status = ?1, notes = COALESCE(?2, notes) WHERE id = ?3",
    )
    .bind(status)
    .bind(notes)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Reservation {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reservation {id} not found")))
}

pub async fn update_notes(pool: &SqlitePool, id: i64, notes: &str) -> RepoResult<Reservation> {
    let rows = sqlx::query("UPDATE reservation SET notes = ?1 WHERE id = ?2")
        .bind(notes)
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Reservation {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reservation {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM reservation WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
