//! サーバー初期化ロジック
//!
//! 鍵導出、ログストア、スナップショット、サンプラーを組み立てて
//! `AppState` を構築する。鍵導出の失敗は致命的で、呼び出し側は
//! サーバーを起動してはならない。

use crate::common::error::{AqiError, AqiResult};
use crate::config::{MonitorConfig, CIPHER_ALGORITHM, ITERATION_COUNT, KEY_DERIVATION_ALGORITHM};
use crate::crypto::kdf::{self, FileSaltStore, SecretKey};
use crate::sampler::{snapshot_channel, Sampler, Sensor};
use crate::shutdown::ShutdownController;
use crate::store::AppendLog;
use crate::surface::ReadSurface;
use crate::AppState;
use std::sync::Arc;
use tokio::task;
use tracing::info;

/// 初期化結果
///
/// サンプラーは呼び出し側が `start()` するまで動かない。
pub struct InitContext {
    /// アプリケーション状態
    pub state: AppState,
    /// サンプリングループ（未起動）
    pub sampler: Sampler,
}

/// 設定ファイルのソルトから鍵を導出する（ソルトが無ければ生成）
///
/// PBKDF2はCPUを占有するため、ブロッキングスレッドで実行する。
pub async fn derive_service_key(config: &MonitorConfig) -> AqiResult<SecretKey> {
    let store = FileSaltStore::new(config.salt_path());
    let password = config.password.clone();
    let key = task::spawn_blocking(move || kdf::derive_key(&password, &store))
        .await
        .map_err(|err| AqiError::KeyDerivation(format!("key derivation task failed: {err}")))??;
    info!(
        salt = %config.salt_path().display(),
        kdf = KEY_DERIVATION_ALGORITHM,
        iterations = ITERATION_COUNT,
        cipher = CIPHER_ALGORITHM,
        "Secret key derived successfully."
    );
    Ok(key)
}

/// 導出済みの鍵から状態とサンプラーを組み立てる
pub fn assemble(config: &MonitorConfig, key: SecretKey, sensor: Arc<dyn Sensor>) -> InitContext {
    let key = Arc::new(key);
    let log = AppendLog::new(config.log_path());
    let (publisher, reader) = snapshot_channel();
    let shutdown = ShutdownController::default();

    let sampler = Sampler::new(sensor, key, log.clone(), publisher)
        .with_threshold(config.high_threshold)
        .with_interval(config.sample_interval);

    let state = AppState {
        surface: ReadSurface::new(reader, log),
        shutdown,
        static_dir: config.static_dir.clone(),
    };

    InitContext { state, sampler }
}

/// サーバー起動に必要な全コンポーネントを初期化する
pub async fn initialize(config: &MonitorConfig, sensor: Arc<dyn Sensor>) -> AqiResult<InitContext> {
    info!("Secure AQI Monitor v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = config.data_dir.as_path();
    if !data_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(data_dir)
            .map_err(|e| AqiError::store(format!("data dir {}", data_dir.display()), e))?;
    }

    let key = derive_service_key(config).await?;
    Ok(assemble(config, key, sensor))
}
