//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `AqiError`は`status_code()`と`external_message()`を提供し、
//! ファイルパスなどの内部情報を漏らさないHTTPエラーレスポンスを生成できます。

use axum::http::StatusCode;
use thiserror::Error;

/// センサー読み取りエラー
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SensorError {
    /// センサーが応答しない
    #[error("Sensor unavailable: {0}")]
    Unavailable(String),

    /// 数値として扱えない読み取り値（NaN / 無限大）
    #[error("Invalid sensor reading: {0}")]
    InvalidReading(f64),
}

/// monitor error type
#[derive(Debug, Error)]
pub enum AqiError {
    /// Key derivation failed (fatal at startup)
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Sensor failed during a tick
    #[error(transparent)]
    Sensor(#[from] SensorError),

    /// Envelope encryption failed
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Envelope could not be decoded or decrypted
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// Log or salt storage unreadable / unwritable
    #[error("Store error: {0}")]
    Store(String),

    /// Resource not found (e.g. the log has never been written)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AqiError {
    /// Returns a safe error message for external clients.
    ///
    /// Full details (including file paths) are only written to server logs
    /// through the `Display` implementation.
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::KeyDerivation(_) => "Service not initialized",
            Self::Sensor(_) => "Sensor unavailable",
            Self::Encryption(_) => "Internal server error",
            Self::Decryption(_) => "Malformed log record",
            Self::Store(_) => "Log storage unavailable",
            Self::NotFound(_) => "No log file found.",
            Self::Config(_) => "Internal server error",
            Self::Internal(_) => "Internal server error",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::KeyDerivation(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Sensor(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Encryption(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Decryption(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// I/Oエラーをストアエラーに変換（対象パスを含める）
    pub fn store(context: impl std::fmt::Display, err: std::io::Error) -> Self {
        Self::Store(format!("{context}: {err}"))
    }
}

/// Result type alias (monitor)
pub type AqiResult<T> = Result<T, AqiError>;
