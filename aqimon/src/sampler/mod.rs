//! サンプリングループ
//!
//! 一定周期でセンサーから1件読み取り、ステータスを分類し、レコードを
//! 暗号化して追記ログへ書き込む。最新値はスナップショットとして公開する。
//! 1tickの失敗はログに記録するだけで、ループは次のtickを予定通り続行する。

/// センサー抽象
pub mod sensor;

/// 最新値スナップショット
pub mod snapshot;

pub use sensor::{ScriptedSensor, Sensor, SimulatedSensor};
pub use snapshot::{snapshot_channel, SnapshotPublisher, SnapshotReader};

use crate::common::error::{AqiError, AqiResult, SensorError};
use crate::common::types::{round_to_tenth, PollutionStatus, Reading};
use crate::crypto::{self, SecretKey};
use crate::shutdown::ShutdownController;
use crate::store::AppendLog;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

/// レコードのタイムスタンプ書式（例: `Sun Oct 18 12:00:05 UTC 2026`）
const RECORD_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Z %Y";

/// 閾値でステータスを分類（閾値ちょうどは `Normal`）
pub fn classify(value: f64, high_threshold: f64) -> PollutionStatus {
    if value > high_threshold {
        PollutionStatus::High
    } else {
        PollutionStatus::Normal
    }
}

/// 読み取り値を平文レコードに整形
pub fn format_record(reading: &Reading) -> String {
    format!(
        "[{}] AQI: {:.1} [{}]",
        reading.timestamp.format(RECORD_TIMESTAMP_FORMAT),
        round_to_tenth(reading.value),
        reading.status.label()
    )
}

/// tick失敗時の段階名（ログ出力用）
fn failed_stage(err: &AqiError) -> &'static str {
    match err {
        AqiError::Sensor(_) => "sensor",
        AqiError::Encryption(_) => "encrypt",
        AqiError::Store(_) => "append",
        _ => "internal",
    }
}

/// サンプリングループ
#[derive(Clone)]
pub struct Sampler {
    sensor: Arc<dyn Sensor>,
    key: Arc<SecretKey>,
    log: AppendLog,
    publisher: Arc<SnapshotPublisher>,
    high_threshold: f64,
    interval: Duration,
}

impl Sampler {
    /// 新しいサンプラーを作成
    pub fn new(
        sensor: Arc<dyn Sensor>,
        key: Arc<SecretKey>,
        log: AppendLog,
        publisher: SnapshotPublisher,
    ) -> Self {
        Self {
            sensor,
            key,
            log,
            publisher: Arc::new(publisher),
            high_threshold: crate::config::DEFAULT_HIGH_THRESHOLD,
            interval: Duration::from_secs(crate::config::DEFAULT_SAMPLE_INTERVAL_SECS),
        }
    }

    /// 高汚染閾値を設定
    pub fn with_threshold(mut self, high_threshold: f64) -> Self {
        self.high_threshold = high_threshold;
        self
    }

    /// サンプリング周期を設定
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// 1tick分の処理
    ///
    /// センサー読み取りに成功した時点でスナップショットを更新し、その後
    /// 暗号化・追記を行う。センサー失敗時はスナップショットを変更しない。
    pub async fn tick(&self) -> AqiResult<Reading> {
        let value = self.sensor.read_value().await?;
        if !value.is_finite() {
            return Err(SensorError::InvalidReading(value).into());
        }

        let reading = Reading {
            value,
            timestamp: Utc::now(),
            status: classify(value, self.high_threshold),
        };
        self.publisher.publish(reading.clone());

        let record = format_record(&reading);
        let envelope = crypto::encrypt(record.as_bytes(), &self.key)?;
        self.log.append(&envelope).await?;

        debug!(aqi = reading.value, status = %reading.status, "Recorded reading");
        Ok(reading)
    }

    /// バックグラウンドでループを開始
    ///
    /// 初回tickは即時に実行し、以降は固定周期。`shutdown` が要求されると
    /// 次のtickをスケジュールせずに終了し、実行中のtickは放棄する。
    pub fn start(self, shutdown: ShutdownController) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    /// ループ本体
    pub async fn run(&self, shutdown: ShutdownController) {
        let mut timer = interval(self.interval);

        info!(
            interval_secs = self.interval.as_secs_f64(),
            threshold = self.high_threshold,
            log = %self.log.path().display(),
            "Sampling loop started"
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown.wait() => {
                    info!("Sampling loop stopped");
                    return;
                }
                _ = timer.tick() => {
                    // 実行中のtickが止まっていてもシャットダウンは待たせない
                    let result = tokio::select! {
                        biased;
                        _ = shutdown.wait() => {
                            info!("Sampling loop stopped during an in-flight tick");
                            return;
                        }
                        result = self.tick() => result,
                    };
                    if let Err(e) = result {
                        match e {
                            AqiError::Sensor(_) => {
                                warn!(stage = failed_stage(&e), error = %e, "Sampling tick skipped");
                            }
                            _ => {
                                error!(stage = failed_stage(&e), error = %e, "Sampling tick failed");
                            }
                        }
                    }
                }
            }
        }
    }
}
