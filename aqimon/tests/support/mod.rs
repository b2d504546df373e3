//! 統合テスト共通ユーティリティ

pub mod http;
pub mod monitor;
