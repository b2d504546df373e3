//! 追記専用ログストア
//!
//! 1つのファイルへの追記と全体読み取りを単一のミューテックスで直列化する。
//! ロック取得からwrite→flush→closeまでをブロッキングスレッド上で一括実行するため、
//! 呼び出し側のFutureがキャンセルされても書きかけの行が観測されることはない。

use crate::common::error::{AqiError, AqiResult};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task;
use tracing::debug;

/// 追記専用ログ
///
/// Clone可能（内部状態はArcで共有）。全クローンが同じロックを共有する。
#[derive(Debug, Clone)]
pub struct AppendLog {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    lock: Mutex<()>,
}

impl Inner {
    fn guard(&self) -> MutexGuard<'_, ()> {
        // 保護対象は `()` なので、ポイズン状態でも整合性は壊れていない
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn append_blocking(&self, buf: &[u8]) -> AqiResult<()> {
        let _guard = self.guard();
        let to_error = |e| AqiError::store(self.path.display(), e);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(to_error)?;
        file.write_all(buf).map_err(to_error)?;
        file.flush().map_err(to_error)?;
        file.sync_data().map_err(to_error)?;
        Ok(())
    }

    fn read_all_blocking(&self) -> AqiResult<Option<Vec<u8>>> {
        let _guard = self.guard();
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AqiError::store(self.path.display(), e)),
        }
    }
}

impl AppendLog {
    /// 指定パスのログを開く（ファイルは初回追記時に作成される）
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: path.into(),
                lock: Mutex::new(()),
            }),
        }
    }

    /// ログファイルのパス
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// 1行を追記する
    ///
    /// `line` に改行を含めてはならない。行末の改行はここで付与する。
    pub async fn append(&self, line: &str) -> AqiResult<()> {
        if line.contains(['\n', '\r']) {
            return Err(AqiError::Internal(
                "log line must not contain a line terminator".to_string(),
            ));
        }

        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        let inner = self.inner.clone();
        task::spawn_blocking(move || inner.append_blocking(&buf))
            .await
            .map_err(|err| AqiError::Internal(format!("Failed to join log writer: {err}")))??;

        debug!(bytes = line.len() + 1, "Appended log record");
        Ok(())
    }

    /// ファイル全体を読み取る
    ///
    /// 一度も書き込まれていない場合は `Ok(None)`（エラーではない）。
    pub async fn read_all(&self) -> AqiResult<Option<Vec<u8>>> {
        let inner = self.inner.clone();
        task::spawn_blocking(move || inner.read_all_blocking())
            .await
            .map_err(|err| AqiError::Internal(format!("Failed to join log reader: {err}")))?
    }

    /// ファイル全体を行単位で読み取る（空行は除外）
    ///
    /// 各行はバイト列のまま返す。壊れた1行が他の行の読み取りを妨げないよう、
    /// UTF-8の検証は呼び出し側が行ごとに行う。
    pub async fn read_lines(&self) -> AqiResult<Option<Vec<Vec<u8>>>> {
        let Some(bytes) = self.read_all().await? else {
            return Ok(None);
        };
        Ok(Some(
            bytes
                .split(|b| *b == b'\n')
                .map(trim_ascii_whitespace)
                .filter(|line| !line.is_empty())
                .map(<[u8]>::to_vec)
                .collect(),
        ))
    }
}

fn trim_ascii_whitespace(mut line: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = line {
        if !first.is_ascii_whitespace() {
            break;
        }
        line = rest;
    }
    while let [rest @ .., last] = line {
        if !last.is_ascii_whitespace() {
            break;
        }
        line = rest;
    }
    line
}
