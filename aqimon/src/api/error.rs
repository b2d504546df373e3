//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use crate::common::error::AqiError;
use axum::{response::IntoResponse, Json};
use serde_json::json;
use tracing::error;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub AqiError);

impl From<AqiError> for AppError {
    fn from(err: AqiError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // 詳細（ファイルパス等）はサーバーログにのみ出力する
        let status = self.0.status_code();
        if status.is_server_error() {
            error!(error = %self.0, status = status.as_u16(), "Request failed");
        }

        let payload = json!({
            "error": self.0.external_message()
        });

        (status, Json(payload)).into_response()
    }
}
