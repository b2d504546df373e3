//! ロギング初期化ユーティリティ
//!
//! `AQIMON_LOG_LEVEL`（未設定なら慣例の `RUST_LOG`）からフィルタを構築し、
//! fmtサブスクライバーを登録する。

use crate::config::get_env;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// デフォルトのログフィルタ
const DEFAULT_LOG_FILTER: &str = "info";

/// ログフィルタ文字列を解決
pub fn log_filter() -> String {
    get_env("AQIMON_LOG_LEVEL")
        .or_else(|| get_env("RUST_LOG"))
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

/// グローバルサブスクライバーを初期化
///
/// 出力先は標準エラー（標準出力は `decrypt` の復号結果に使う）。
/// 既に初期化済みの場合はエラーを返す。
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter =
        EnvFilter::try_new(log_filter()).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
}
