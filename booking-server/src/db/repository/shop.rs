//! Shop Repository

use shared::models::{Shop, ShopCreate, ShopUpdate};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const COLUMNS: &str = "id, name, description, address, phone, opening_time, closing_time, \
                       slot_duration, max_capacity, is_active, created_at";

pub async fn find_all_active(pool: &SqlitePool) -> RepoResult<Vec<Shop>> {
    let shops = sqlx::query_as::<_, Shop>(&format!(
        "SELECT {COLUMNS} FROM shop WHERE is_active = 1 ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(shops)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Shop>> {
    let shop = sqlx::query_as::<_, Shop>(&format!("SELECT {COLUMNS} FROM shop WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(shop)
}

pub async fn create(pool: &SqlitePool, data: ShopCreate) -> RepoResult<Shop> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO shop (name, description, address, phone, opening_time, closing_time, \
         slot_duration, max_capacity, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(data.opening_time.as_deref().unwrap_or("09:00"))
    .bind(data.closing_time.as_deref().unwrap_or("18:00"))
    .bind(data.slot_duration.unwrap_or(30))
    .bind(data.max_capacity.unwrap_or(1))
    .bind(now_millis())
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create shop".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ShopUpdate) -> RepoResult<Shop> {
    let rows = sqlx::query(
        "UPDATE shop SET \
         name = COALESCE(?1, name), \
         description = COALESCE(?2, description), \
         address = COALESCE(?3, address), \
         phone = COALESCE(?4, phone), \
         opening_time = COALESCE(?5, opening_time), \
         closing_time = COALESCE(?6, closing_time), \
         slot_duration = COALESCE(?7, slot_duration), \
         max_capacity = COALESCE(?8, max_capacity), \
         is_active = COALESCE(?9, is_active) \
         WHERE id = ?10",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(&data.opening_time)
    .bind(&data.closing_time)
    .bind(data.slot_duration)
    .bind(data.max_capacity)
    .bind(data.is_active)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Shop {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Shop {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    // Reservations cascade via FK
    let rows = sqlx::query("DELETE FROM shop WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
