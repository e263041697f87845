//! User Repository

use shared::models::{ProfileUpdate, Role, User, UserResponse};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const COLUMNS: &str =
    "id, name, email, phone, password_hash, role, shop_id, is_active, created_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM user WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {COLUMNS} FROM user WHERE email = ? LIMIT 1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// All accounts with their shop name (super admin view)
pub async fn list_all(pool: &SqlitePool) -> RepoResult<Vec<UserResponse>> {
    let users = sqlx::query_as::<_, UserResponse>(
        "SELECT u.id, u.name, u.email, u.phone, u.role, u.shop_id, s.name AS shop_name, \
         u.is_active, u.created_at \
         FROM user u LEFT JOIN shop s ON u.shop_id = s.id \
         ORDER BY u.created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub role: Role,
    pub shop_id: Option<i64>,
}

pub async fn create(pool: &SqlitePool, new: NewUser<'_>) -> RepoResult<User> {
    if let Some(email) = new.email
        && find_by_email(pool, email).await?.is_some()
    {
        return Err(RepoError::Duplicate(format!(
            "Account with email {email} already exists"
        )));
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO user (name, email, phone, password_hash, role, shop_id, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(new.name)
    .bind(new.email)
    .bind(new.phone)
    .bind(new.password_hash)
    .bind(new.role)
    .bind(new.shop_id)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn set_password_hash(pool: &SqlitePool, id: i64, hash: &str) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE user SET password_hash = ?1 WHERE id = ?2")
        .bind(hash)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

pub async fn update_profile(pool: &SqlitePool, id: i64, data: ProfileUpdate) -> RepoResult<User> {
    let rows = sqlx::query(
        "UPDATE user SET \
         name = COALESCE(?1, name), \
         email = COALESCE(?2, email), \
         phone = COALESCE(?3, phone) \
         WHERE id = ?4",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

/// Count of active super admin accounts (bootstrap check)
pub async fn count_super_admins(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM user WHERE role = 'super_admin' AND is_active = 1",
    )
    .fetch_one(pool)
    .await?;
    Ok(count)
}
