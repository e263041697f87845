//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::models::{Role, User};
use thiserror::Error;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: load_jwt_secret(),
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "booking-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "booking-clients".to_string()),
        }
    }
}

/// 从环境变量加载 JWT 密钥
///
/// 生产环境必须设置 `JWT_SECRET` (>= 32 字符)；开发环境缺省时
/// 生成一次性随机密钥（重启后所有令牌失效）。
fn load_jwt_secret() -> String {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= 32 => secret,
        Ok(_) => panic!("JWT_SECRET must be at least 32 characters long"),
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    "⚠️  JWT_SECRET not set! Generating temporary key for development."
                );
                crate::utils::password::generate_password(64)
            }
            #[cfg(not(debug_assertions))]
            {
                panic!("JWT_SECRET environment variable must be set in production!");
            }
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 显示名
    pub name: String,
    /// 角色: customer | shop_admin | super_admin
    pub role: String,
    /// shop_admin 绑定的店铺
    pub shop_id: Option<i64>,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT 令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// 使用默认配置创建新的 JWT 服务
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户生成新令牌
    pub fn generate_token(&self, user: &User) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user.id.to_string(),
            name: user.name.clone(),
            role: user.role.to_string(),
            shop_id: user.shop_id,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {e}")),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证提取器创建，注入到请求处理函数。
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub role: Role,
    pub shop_id: Option<i64>,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| format!("Malformed subject: {}", claims.sub))?;
        let role =
            Role::parse(&claims.role).ok_or_else(|| format!("Unknown role: {}", claims.role))?;
        Ok(Self {
            id,
            name: claims.name,
            role,
            shop_id: claims.shop_id,
        })
    }
}

impl CurrentUser {
    /// 是否平台管理员
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// 是否可以管理指定店铺 (该店 shop_admin 或 super_admin)
    pub fn manages_shop(&self, shop_id: i64) -> bool {
        match self.role {
            Role::SuperAdmin => true,
            Role::ShopAdmin => self.shop_id == Some(shop_id),
            Role::Customer => false,
        }
    }

    /// 映射为 booking 引擎的显式授权上下文
    pub fn actor(&self) -> crate::booking::Actor {
        use crate::booking::Actor;
        match self.role {
            Role::SuperAdmin => Actor::SuperAdmin { user_id: self.id },
            Role::ShopAdmin => match self.shop_id {
                Some(shop_id) => Actor::ShopAdmin {
                    user_id: self.id,
                    shop_id,
                },
                // shop_admin without a bound shop has customer-level power
                None => Actor::Customer { user_id: self.id },
            },
            Role::Customer => Actor::Customer { user_id: self.id },
        }
    }
}

/// Guest-or-user mapping for optional-auth routes
pub fn actor_of(user: Option<&CurrentUser>) -> crate::booking::Actor {
    user.map(CurrentUser::actor)
        .unwrap_or(crate::booking::Actor::Guest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-key-that-is-long-enough!".to_string(),
            expiration_minutes: 60,
            issuer: "booking-server".to_string(),
            audience: "booking-clients".to_string(),
        })
    }

    fn user(role: Role, shop_id: Option<i64>) -> User {
        User {
            id: 42,
            name: "Saruul".to_string(),
            email: Some("saruul@example.mn".to_string()),
            phone: None,
            password_hash: None,
            role,
            shop_id,
            is_active: true,
            created_at: 0,
        }
    }

    #[test]
    fn token_roundtrip() {
        let service = service();
        let token = service.generate_token(&user(Role::ShopAdmin, Some(3))).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, "shop_admin");
        assert_eq!(claims.shop_id, Some(3));

        let current = CurrentUser::try_from(claims).unwrap();
        assert_eq!(current.id, 42);
        assert!(current.manages_shop(3));
        assert!(!current.manages_shop(4));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = service();
        let token = service.generate_token(&user(Role::Customer, None)).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.validate_token(&tampered).is_err());
    }

    #[test]
    fn super_admin_manages_everything() {
        let claims_user = user(Role::SuperAdmin, None);
        let service = service();
        let token = service.generate_token(&claims_user).unwrap();
        let current = CurrentUser::try_from(service.validate_token(&token).unwrap()).unwrap();
        assert!(current.is_super_admin());
        assert!(current.manages_shop(1));
        assert!(current.manages_shop(999));
    }
}
