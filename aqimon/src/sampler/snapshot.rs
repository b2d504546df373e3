//! 最新読み取り値のスナップショット
//!
//! 単一値レジスタ（`tokio::sync::watch`）。読み手は常に直前か最新の
//! `Reading` 全体を受け取り、値とステータスが異なるtick由来で混ざることはない。
//! ログストアのロックとは独立している。

use crate::common::types::{CurrentReading, Reading};
use tokio::sync::watch;

/// 書き込み側（サンプリングループが所有）
#[derive(Debug)]
pub struct SnapshotPublisher {
    tx: watch::Sender<Reading>,
}

/// 読み取り側（Clone可能、任意の数の同時読み取りに対応）
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    rx: watch::Receiver<Reading>,
}

/// 初期値 `Reading::initializing()` のスナップショットを作成
pub fn snapshot_channel() -> (SnapshotPublisher, SnapshotReader) {
    let (tx, rx) = watch::channel(Reading::initializing());
    (SnapshotPublisher { tx }, SnapshotReader { rx })
}

impl SnapshotPublisher {
    /// 新しい読み取り値を公開する
    ///
    /// 読み手が一人もいなくても失敗しない。
    pub fn publish(&self, reading: Reading) {
        self.tx.send_replace(reading);
    }
}

impl SnapshotReader {
    /// APIレスポンス形式の最新値
    pub fn current(&self) -> CurrentReading {
        CurrentReading::from(&*self.rx.borrow())
    }
}
