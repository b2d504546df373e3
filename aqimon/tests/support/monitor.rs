use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use aqimon::bootstrap::{self, InitContext};
use aqimon::config::MonitorConfig;
use aqimon::sampler::ScriptedSensor;

use super::http::{spawn_app, TestServer};

/// テスト用の設定（データディレクトリ以外は既定値）
pub fn test_config(data_dir: &Path) -> MonitorConfig {
    MonitorConfig {
        data_dir: data_dir.to_path_buf(),
        password: "sid1234".to_string(),
        sample_interval: Duration::from_secs(5),
        high_threshold: 150.0,
        static_dir: None,
    }
}

/// 台本どおりの値を返すセンサーでモニターを初期化する
pub async fn init_monitor(config: &MonitorConfig, values: &[f64]) -> InitContext {
    bootstrap::initialize(config, Arc::new(ScriptedSensor::from_values(values.to_vec())))
        .await
        .expect("monitor initialization failed")
}

/// 初期化済みモニターのAPIを実ポートで起動する
pub async fn spawn_monitor(ctx: &InitContext) -> TestServer {
    spawn_app(aqimon::api::create_app(ctx.state.clone())).await
}
