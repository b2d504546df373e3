//! axumサーバー起動・シャットダウンハンドリング

use crate::common::error::{AqiError, AqiResult};
use crate::shutdown::ShutdownController;
use crate::AppState;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// axumサーバーを起動し、シャットダウンシグナルを待機する
///
/// シグナル受信時はコントローラーにも停止を要求し、サンプリングループを止める。
pub async fn run(state: AppState, bind_addr: &str) -> AqiResult<()> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| AqiError::Config(format!("Failed to bind to {bind_addr}: {e}")))?;
    serve(listener, state).await
}

/// バインド済みのリスナーでサーバーを動かす
pub async fn serve(listener: TcpListener, state: AppState) -> AqiResult<()> {
    let shutdown = state.shutdown.clone();
    let app = crate::api::create_app(state);

    if let Ok(addr) = listener.local_addr() {
        info!("Secure AQI Monitor listening on {}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .map_err(|e| AqiError::Internal(format!("Server error: {e}")))?;

    info!("Server shutdown complete");
    Ok(())
}

/// シャットダウンシグナルを待機
async fn shutdown_signal(shutdown: ShutdownController) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
        _ = shutdown.wait() => {
            info!("Shutdown requested, shutting down...");
        }
    }

    shutdown.request_shutdown();
}
