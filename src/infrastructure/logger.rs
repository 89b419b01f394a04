//! 日志基础设施
//!
//! 进程启动时构建一次全局 subscriber，其余模块只使用 `tracing` 宏。

use super::config::LoggingConfig;
use anyhow::Result;
use std::io;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

pub struct Logger;

impl Logger {
    /// 初始化日志系统
    ///
    /// - `RUST_LOG` 存在时优先使用，否则使用配置中的级别
    /// - 控制台输出可以关闭
    /// - 配置了 `log_path` 时额外写入按天滚动的日志文件
    ///
    /// 返回的 guard 必须在进程生命周期内持有，丢弃后文件写入线程会停止。
    pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))?;

        let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
        let mut guard = None;

        if let Some(log_dir) = &config.log_path {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = rolling::daily(log_dir, &config.file_prefix);
            let (writer, file_guard) = non_blocking(file_appender);
            guard = Some(file_guard);

            layers.push(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false) // 文件中不使用颜色
                    .with_target(false)
                    .with_thread_names(true)
                    .boxed(),
            );
        }

        if config.console_output {
            layers.push(fmt::layer().with_writer(io::stdout).with_ansi(true).boxed());
        }

        tracing_subscriber::registry()
            .with(layers)
            .with(filter)
            .try_init()?;

        Ok(guard)
    }
}
