//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResponse`] - 应用错误类型和响应结构
//! - [`logger`] - tracing 初始化
//! - [`time`] - 日期/时段解析
//! - [`password`] - Argon2 哈希与一次性密码生成
//! - [`validation`] - 输入校验

pub mod error;
pub mod logger;
pub mod password;
pub mod result;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse};
pub use result::AppResult;
