use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::seating::SeatingCoordinator;

/// 服务器状态 - 持有所有服务的共享引用
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | seating | SeatingCoordinator | 入座/清台事务协调 |
///
/// Clone 只复制连接池句柄，成本很低。
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// 座位协调器
    pub seating: SeatingCoordinator,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替
    pub fn new(config: Config, db: DbService) -> Self {
        let seating = SeatingCoordinator::new(db.clone());
        Self {
            config,
            db,
            seating,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 确保工作目录存在
    /// 2. 打开数据库并执行迁移
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir()?;
        if config.db_max_connections == 0 {
            return Err(ServerError::Config(
                "DB_MAX_CONNECTIONS must be at least 1".into(),
            ));
        }

        let db = DbService::new(config.database_file(), config.db_max_connections).await?;
        Ok(Self::new(config.clone(), db))
    }
}
