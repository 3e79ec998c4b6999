//! API 模块
//!
//! 对外暴露中继服务的 HTTP 接口

pub mod routes;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::workflow::QuizFlow;

pub use routes::{build_router, AppState, IMAGE_FIELD};

/// 启动中继服务，直到进程退出
pub async fn serve(config: &Config, flow: QuizFlow) -> Result<()> {
    let addr = config.socket_addr()?;
    let app = build_router(AppState { flow }, config.max_upload_bytes);

    let listener = TcpListener::bind(addr).await?;
    info!("✓ HTTP 服务已启动: http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
