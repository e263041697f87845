use std::path::PathBuf;
use std::sync::Arc;

use shared::models::Role;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{self, user::NewUser};
use crate::utils::password::{GENERATED_PASSWORD_LEN, generate_password, hash_password};

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是预约服务的核心数据结构。
/// 使用 Arc / 连接池实现浅拷贝，克隆成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保数据库目录存在)
    /// 2. 数据库 (迁移在 DbService::new 中执行)
    /// 3. JWT 服务
    /// 4. 首次启动引导 (无超级管理员时创建一个)
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let db_path = config.database_path();
        if let Some(parent) = PathBuf::from(&db_path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = DbService::new(&db_path).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self {
            config: config.clone(),
            db,
            jwt_service,
        };
        state.bootstrap_super_admin().await?;

        Ok(state)
    }

    /// 测试用：内存数据库状态
    pub async fn in_memory(config: Config) -> anyhow::Result<Self> {
        let db = DbService::in_memory().await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let state = Self {
            config,
            db,
            jwt_service,
        };
        state.bootstrap_super_admin().await?;
        Ok(state)
    }

    /// 首次启动引导：确保系统至少有一个超级管理员
    ///
    /// 密码未通过 `BOOTSTRAP_ADMIN_PASSWORD` 指定时随机生成，
    /// 只在日志中打印一次。
    async fn bootstrap_super_admin(&self) -> anyhow::Result<()> {
        if repository::user::count_super_admins(&self.db.pool).await? > 0 {
            return Ok(());
        }

        let generated;
        let password = match &self.config.bootstrap_admin_password {
            Some(p) => p.as_str(),
            None => {
                generated = generate_password(GENERATED_PASSWORD_LEN);
                generated.as_str()
            }
        };
        let hash = hash_password(password)?;

        let admin = repository::user::create(&self.db.pool, NewUser {
            name: "System Administrator",
            email: Some(&self.config.bootstrap_admin_email),
            phone: None,
            password_hash: Some(&hash),
            role: Role::SuperAdmin,
            shop_id: None,
        })
        .await?;

        tracing::warn!(
            user_id = admin.id,
            email = %self.config.bootstrap_admin_email,
            "Bootstrap super admin created — initial password: {password}"
        );

        Ok(())
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }
}
