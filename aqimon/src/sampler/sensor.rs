//! センサー抽象
//!
//! 本番用のシミュレーションセンサーと、テスト用の決定的なスクリプトセンサーを提供する。

use crate::common::error::SensorError;
use async_trait::async_trait;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::Mutex;

/// 1tickにつき1回呼ばれる読み取り元
#[async_trait]
pub trait Sensor: Send + Sync {
    /// 現在のAQI値を読み取る
    async fn read_value(&self) -> Result<f64, SensorError>;
}

/// シミュレーションセンサー（`[30, 180)` の一様分布）
#[derive(Debug, Clone, Default)]
pub struct SimulatedSensor;

/// シミュレーション値の下限
const SIMULATED_MIN: f64 = 30.0;
/// シミュレーション値の幅
const SIMULATED_SPAN: f64 = 150.0;

#[async_trait]
impl Sensor for SimulatedSensor {
    async fn read_value(&self) -> Result<f64, SensorError> {
        let offset: f64 = rand::thread_rng().gen::<f64>() * SIMULATED_SPAN;
        Ok(SIMULATED_MIN + offset)
    }
}

/// 事前に用意した結果を順に返すセンサー
///
/// 用意した結果を使い切ると `SensorError::Unavailable` を返す。
#[derive(Debug, Default)]
pub struct ScriptedSensor {
    script: Mutex<VecDeque<Result<f64, SensorError>>>,
}

impl ScriptedSensor {
    /// 結果列から作成
    pub fn new(script: impl IntoIterator<Item = Result<f64, SensorError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    /// 値のみの列から作成
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(values.into_iter().map(Ok))
    }

    /// 残りの結果数
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|script| script.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Sensor for ScriptedSensor {
    async fn read_value(&self) -> Result<f64, SensorError> {
        let next = self
            .script
            .lock()
            .map_err(|_| SensorError::Unavailable("script lock poisoned".to_string()))?
            .pop_front();
        next.unwrap_or_else(|| Err(SensorError::Unavailable("script exhausted".to_string())))
    }
}
