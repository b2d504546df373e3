//! 共通型定義とエラー型

/// エラー型
pub mod error;

/// 読み取り値・ステータス型
pub mod types;
