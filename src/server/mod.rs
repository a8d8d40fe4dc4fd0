pub mod response;
pub mod routes;
pub mod upload;

use crate::Result;
use crate::config::AppConfig;
use crate::parser::Extractor;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;

pub use response::ApiError;

/// HTTP 服务的共享只读状态
#[derive(Debug, Clone)]
pub struct AppState {
    pub extractor: Extractor,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            extractor: Extractor::with_options(config.extract.clone()),
            max_upload_bytes: config.server.max_upload_bytes,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/convert", post(routes::convert))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(Arc::new(state))
}

/// 在已绑定的监听器上提供服务，直到 future 被丢弃
pub async fn run(listener: TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// 绑定配置的地址并运行服务，Ctrl-C 时优雅退出
pub async fn serve(config: &AppConfig) -> Result<()> {
    let listener = TcpListener::bind(config.server.bind_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router(AppState::from_config(config)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
