//! HTTP服务器生命周期管理

use super::{
    middleware::{create_middleware_stack, request_logger},
    routes::create_router,
    AppState,
};
use axum::{middleware, Router};
use std::net::SocketAddr;
use std::time::Duration;
use tasklist_core::api::{AppContext, CliError, ServerConfig};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// 处理 serve 命令（CLI 覆盖项已合并进 ctx 的配置）
pub async fn handle_serve(ctx: &AppContext) -> Result<(), CliError> {
    let cfg = ctx.cfg();

    let service = ctx
        .build_service(&cfg.store)
        .await
        .map_err(|e| CliError::Server(format!("{e:#}")))?;

    let (shutdown_tx, _) = broadcast::channel(1);
    let state = AppState::new(service, shutdown_tx);

    start_server(&cfg.server, state)
        .await
        .map_err(|e| CliError::Server(e.to_string()))
}

/// 组装路由与中间件
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    create_router(state)
        .layer(middleware::from_fn(request_logger))
        .layer(create_middleware_stack(request_timeout))
}

/// 启动HTTP服务器
pub async fn start_server(
    config: &ServerConfig,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on http://{}", addr);

    let timeout = Duration::from_secs(config.request_timeout_secs.max(1));
    serve_with_listener(listener, state, timeout).await?;
    Ok(())
}

/// 在已绑定的监听器上运行，直到收到关闭信号
pub async fn serve_with_listener(
    listener: TcpListener,
    state: AppState,
    request_timeout: Duration,
) -> std::io::Result<()> {
    let mut shutdown_rx = state.shutdown_tx.subscribe();
    let backend = state.service.backend().to_string();
    let app = build_app(state, request_timeout);

    info!(backend = %backend, "Task store server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!("Received Ctrl+C signal");
                }
                _ = shutdown_rx.recv() => {
                    info!("Received shutdown signal from API");
                }
                _ = wait_for_sigterm() => {
                    info!("Received SIGTERM signal");
                }
            }

            info!("Starting graceful shutdown...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// 等待 SIGTERM 信号（Unix系统）
#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!("Failed to setup SIGTERM handler: {}", e);
            std::future::pending::<()>().await
        }
    }
}

/// Windows 系统不支持 SIGTERM，使用空操作
#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
