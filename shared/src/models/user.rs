//! User Model (顾客 + 店铺管理员 + 平台管理员)

use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum Role {
    Customer,
    ShopAdmin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::ShopAdmin => "shop_admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(Self::Customer),
            "shop_admin" => Some(Self::ShopAdmin),
            "super_admin" => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    /// Shop or super administrator
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::ShopAdmin | Self::SuperAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User DB row — the password hash never leaves the server
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub role: Role,
    /// Shop binding for shop_admin accounts
    pub shop_id: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
}

/// User response (without credentials)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub shop_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "db", sqlx(default))]
    pub shop_name: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            phone: u.phone,
            role: u.role,
            shop_id: u.shop_id,
            shop_name: None,
            is_active: u.is_active,
            created_at: u.created_at,
        }
    }
}

/// Create admin account payload (super admin only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub shop_id: Option<i64>,
}

/// Created account + one-time password (shown exactly once)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreated {
    pub user: UserResponse,
    /// Generated password — not recoverable later
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Self-service profile update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Self-service password change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Reset result (super admin resets an account's password)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordReset {
    pub user_id: i64,
    /// New generated password — not recoverable later
    pub password: String,
}
