//! Seating Server - 餐厅预约与桌台管理
//!
//! # 架构概述
//!
//! - **规则** (`rules`): 预约/桌台请求校验，日期时间与营业时间规则
//! - **座位** (`seating`): 状态流转与入座/清台事务
//! - **数据库** (`db`): SQLite (sqlx) 存储与迁移
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! seating-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── rules/         # 纯校验逻辑
//! ├── seating/       # 状态机与协调器
//! ├── db/            # 数据库层
//! ├── middleware/    # 请求日志
//! └── utils/         # 日志、字段校验
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod middleware;
pub mod rules;
pub mod seating;
pub mod utils;

// Re-export 公共类型
pub use api::{build_app, build_router};
pub use crate::core::{Config, Server, ServerError, ServerState};
pub use db::DbService;
pub use seating::SeatingCoordinator;

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 按配置初始化日志
pub fn setup_environment(config: &Config) {
    init_logger_with_file(
        Some(&config.log_level),
        config.is_production(),
        config.log_dir.as_deref(),
    );
}
