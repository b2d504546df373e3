//! REST APIハンドラー
//!
//! 最新値・暗号化ログの読み取りAPIと、任意の静的アセット配信

/// APIエラーレスポンス
pub mod error;
/// 読み取りAPI
pub mod readings;

use crate::AppState;
use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// APIルーターを作成
///
/// 全レスポンスに許可的なCORSヘッダーを付与する。
pub fn create_app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/api/aqi", get(readings::get_current))
        .route("/api/log", get(readings::get_log))
        .route("/health", get(readings::health));

    if let Some(dir) = state.static_dir.as_ref() {
        router = router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
