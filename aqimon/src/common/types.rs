//! 共通型定義
//!
//! Reading, PollutionStatus等のコアデータ型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 汚染ステータス
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PollutionStatus {
    /// 初回サンプリング前
    #[default]
    Initializing,
    /// 閾値以下
    Normal,
    /// 閾値超過
    High,
}

impl PollutionStatus {
    /// 表示用ラベル（ログレコードとAPIレスポンスで共通）
    pub fn label(&self) -> &'static str {
        match self {
            PollutionStatus::Initializing => "Initializing...",
            PollutionStatus::Normal => "Normal",
            PollutionStatus::High => "⚠️ HIGH POLLUTION",
        }
    }
}

impl std::fmt::Display for PollutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 1回のサンプリングで得られた読み取り値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// AQI値
    pub value: f64,
    /// 読み取り時刻（UTC）
    pub timestamp: DateTime<Utc>,
    /// 分類済みステータス
    pub status: PollutionStatus,
}

impl Reading {
    /// 初回tick前にスナップショットが保持するプレースホルダー
    pub fn initializing() -> Self {
        Self {
            value: 0.0,
            timestamp: Utc::now(),
            status: PollutionStatus::Initializing,
        }
    }
}

/// `GET /api/aqi` のレスポンス
///
/// ```json
/// {"aqi": 87.3, "status": "Normal"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentReading {
    /// 小数第1位に丸めたAQI値
    pub aqi: f64,
    /// ステータスラベル
    pub status: String,
}

/// 小数第1位に丸める（端数0.5は0から遠い方へ）
///
/// APIレスポンスとログレコードの両方がこの値を使う。
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl From<&Reading> for CurrentReading {
    fn from(reading: &Reading) -> Self {
        Self {
            aqi: round_to_tenth(reading.value),
            status: reading.status.label().to_string(),
        }
    }
}
