//! Logging Infrastructure
//!
//! Structured logging via `tracing`. `RUST_LOG` wins over the configured
//! level. Production uses JSON lines; with a log directory the output goes
//! to a daily rolling file instead of stdout.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with the default level and console output
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Initialize the logger with optional JSON format and file output
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // 目录不存在时退回控制台输出
    let file_appender = log_dir
        .map(Path::new)
        .filter(|path| path.exists())
        .and_then(|path| path.to_str())
        .map(|dir| tracing_appender::rolling::daily(dir, "seating-server"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    match (json, file_appender) {
        (true, Some(appender)) => subscriber.json().with_writer(appender).init(),
        (true, None) => subscriber.json().init(),
        (false, Some(appender)) => subscriber.with_writer(appender).with_ansi(false).init(),
        (false, None) => subscriber.init(),
    }
}
