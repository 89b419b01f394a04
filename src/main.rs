use anyhow::Context;
use std::{env, path::PathBuf, time::Duration};
use tokio::net::TcpListener;
use tracing::info;
use users_arch::infrastructure::{logger::Logger, spawn_audit_logger, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 第一个参数是可选的配置文件路径
    let config_path = env::args().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref()).context("加载配置失败")?;

    let _log_guard = Logger::init(&config.logging).context("初始化日志失败")?;

    info!(
        storage = %config.storage.backend,
        "启动用户服务..."
    );

    let state = users_arch::build_state(&config);
    let audit = spawn_audit_logger(state.user_service.events());
    info!(
        subscribers = state.user_service.events().subscriber_count(),
        "事件总线订阅者已启动"
    );

    let app = users_arch::build_router(
        state,
        Duration::from_secs(config.http.timeout_seconds),
    );

    let address = config.http.socket_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("无法绑定到 {}", address))?;

    info!("🚀 用户服务运行在 http://{}", address);
    info!("📖 API 端点:");
    info!("   GET    /                          - 欢迎信息");
    info!("   GET    /health                    - 健康检查");
    info!("   GET    /api/users                 - 获取所有用户");
    info!("   POST   /api/users                 - 创建新用户");
    info!("   GET    /api/users/:id             - 获取特定用户");
    info!("   PUT    /api/users/:id             - 更新用户");
    info!("   DELETE /api/users/:id             - 删除用户");
    info!("   GET    /api/users/:id/history     - 事件历史 (event_sourced)");
    info!("   GET    /api/events                - 查询事件日志 (event_sourced)");
    info!("   POST   /api/events/rebuild        - 重建投影 (event_sourced)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("服务器运行失败")?;

    audit.abort();
    info!("✅ 服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // 无法安装信号处理器时一直运行
        std::future::pending::<()>().await;
    }
    info!("收到停止信号，正在关闭...");
}
