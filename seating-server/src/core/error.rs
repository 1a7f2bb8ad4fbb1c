use shared::AppError;
use thiserror::Error;

/// 启动与运行期错误 (请求级错误使用 [`AppError`])
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("初始化失败: {0}")]
    Startup(#[from] AppError),
}

pub type Result<T> = std::result::Result<T, ServerError>;
