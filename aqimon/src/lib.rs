//! Secure AQI Monitor
//!
//! 大気質センサーを定期サンプリングし、各読み取り値を暗号化レコードとして
//! 追記専用ログに保存する。最新値と暗号化ログを読み取り専用HTTP APIで公開する。

#![warn(missing_docs)]

/// 共通型定義・エラー型
pub mod common;

/// REST APIハンドラー
pub mod api;

/// サーバー初期化
pub mod bootstrap;

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー・固定定数）
pub mod config;

/// 鍵導出・エンベロープ暗号化
pub mod crypto;

/// ロギング初期化ユーティリティ
pub mod logging;

/// サンプリングループ
pub mod sampler;

/// axumサーバー起動
pub mod server;

/// Shutdown controller (sampling loop + server)
pub mod shutdown;

/// 追記専用ログストア
pub mod store;

/// 読み取り専用サーフェス
pub mod surface;

use std::path::PathBuf;

/// アプリケーション状態
///
/// 起動時に一度だけ構築し、HTTPハンドラーへ共有する。
/// 鍵はサンプラーのみが保持し、ここには含めない。
#[derive(Clone)]
pub struct AppState {
    /// 最新値・暗号化ログの読み取りサーフェス
    pub surface: surface::ReadSurface,
    /// Cooperative shutdown controller
    pub shutdown: shutdown::ShutdownController,
    /// 静的アセットディレクトリ（未設定なら配信しない）
    pub static_dir: Option<PathBuf>,
}
