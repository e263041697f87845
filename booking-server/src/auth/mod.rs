//! 认证授权模块
//!
//! 提供 JWT 认证和请求提取器：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文 (axum 提取器)
//! - [`actor_of`] - 可选登录态到授权上下文的映射

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, actor_of};
