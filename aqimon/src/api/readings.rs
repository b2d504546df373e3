//! 読み取りAPI
//!
//! `GET /api/aqi` と `GET /api/log` を提供する。どちらも状態を変更しない。

use super::error::AppError;
use crate::common::types::CurrentReading;
use crate::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

/// ログ未作成時の本文
pub const LOG_NOT_FOUND_BODY: &str = "No log file found.";

/// GET /api/aqi
pub async fn get_current(State(state): State<AppState>) -> Json<CurrentReading> {
    Json(state.surface.current())
}

/// GET /api/log
///
/// 暗号化ログをそのまま返す。未作成なら404（空の200ではない）。
pub async fn get_log(State(state): State<AppState>) -> Result<Response, AppError> {
    let response = match state.surface.log_bytes().await? {
        Some(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            bytes,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            LOG_NOT_FOUND_BODY,
        )
            .into_response(),
    };
    Ok(response)
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
