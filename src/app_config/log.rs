use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, FmtSubscriber, Layer, Registry};

use crate::app_config::env::{env_non_empty, env_or_default};

// 保持日志文件句柄直到进程退出
static INFO_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static ERROR_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// 设置日志
///
/// `APP_ENV=LOCAL` 输出到控制台（stderr，stdout 留给报告），
/// 其他环境按天滚动写入 `LOG_DIR` 下的 info.log / error.log。
/// 设置了 `RUST_LOG` 时以其为准。
pub fn setup_logging() -> anyhow::Result<()> {
    let app_env = env_or_default("APP_ENV", "LOCAL");

    if app_env.eq_ignore_ascii_case("LOCAL") {
        let filter = env_non_empty("RUST_LOG")
            .map(EnvFilter::new)
            .unwrap_or_else(|| EnvFilter::new("debug"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_ansi(true)
            .with_target(false)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_level(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        return Ok(());
    }

    let log_dir = env_or_default("LOG_DIR", "log_files");
    let info_file = RollingFileAppender::new(Rotation::DAILY, &log_dir, "info.log");
    let error_file = RollingFileAppender::new(Rotation::DAILY, &log_dir, "error.log");

    let (info_non_blocking, info_guard) = tracing_appender::non_blocking(info_file);
    let (error_non_blocking, error_guard) = tracing_appender::non_blocking(error_file);
    let _ = INFO_GUARD.set(info_guard);
    let _ = ERROR_GUARD.set(error_guard);

    let info_filter = env_non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string());

    let subscriber = Registry::default()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .with_writer(info_non_blocking)
                .with_filter(EnvFilter::new(info_filter)),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .with_writer(error_non_blocking)
                .with_filter(EnvFilter::new("error")),
        );

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
