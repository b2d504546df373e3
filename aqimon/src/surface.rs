//! 読み取り専用サーフェス
//!
//! HTTP層から呼ばれる2つの純粋なクエリ（最新値・暗号化ログ全体）を提供する。

use crate::common::error::AqiResult;
use crate::common::types::CurrentReading;
use crate::sampler::SnapshotReader;
use crate::store::AppendLog;

/// 読み取り専用クエリ
#[derive(Debug, Clone)]
pub struct ReadSurface {
    snapshot: SnapshotReader,
    log: AppendLog,
}

impl ReadSurface {
    /// 新しいサーフェスを作成
    pub fn new(snapshot: SnapshotReader, log: AppendLog) -> Self {
        Self { snapshot, log }
    }

    /// 最新の読み取り値とステータス（ログのロックは取得しない）
    pub fn current(&self) -> CurrentReading {
        self.snapshot.current()
    }

    /// 暗号化ログの生バイト列
    ///
    /// ログ未作成の場合は `Ok(None)`。空のバイト列とは区別される。
    pub async fn log_bytes(&self) -> AqiResult<Option<Vec<u8>>> {
        self.log.read_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::snapshot_channel;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_log_bytes_absent_before_first_append() {
        let dir = tempdir().unwrap();
        let (_publisher, reader) = snapshot_channel();
        let surface = ReadSurface::new(reader, AppendLog::new(dir.path().join("aqi_log.enc")));

        assert_eq!(surface.log_bytes().await.unwrap(), None);
        assert_eq!(surface.current().status, "Initializing...");
    }

    #[tokio::test]
    async fn test_log_bytes_returns_raw_file() {
        let dir = tempdir().unwrap();
        let log = AppendLog::new(dir.path().join("aqi_log.enc"));
        log.append("QUJD").await.unwrap();
        let (_publisher, reader) = snapshot_channel();
        let surface = ReadSurface::new(reader, log);

        assert_eq!(surface.log_bytes().await.unwrap(), Some(b"QUJD\n".to_vec()));
    }
}
