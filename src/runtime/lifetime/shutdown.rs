use std::sync::Arc;

use tokio::signal;
use tracing::warn;

use crate::services::ChatManager;

pub async fn listen_for_shutdown(chat_manager: Arc<ChatManager>) {
    // 等待 Ctrl+C 信号
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        return;
    }
    warn!("Shutdown signal received, initiating graceful shutdown...");

    let closed = chat_manager.shutdown_all();
    warn!("Closed {} chat connection(s)", closed);
}
