//! decrypt サブコマンド
//!
//! 既存のソルトとパスワードから鍵を導出し、暗号化ログの各行を順に復号して
//! 表示します。復号できない行は報告のみ行い、処理は続行します。
//! ソルトが存在しない場合は新規作成せずにエラーとします。

use crate::common::error::{AqiError, AqiResult};
use crate::config::{DEFAULT_PASSWORD, LOG_FILE_NAME, SALT_FILE_NAME};
use crate::crypto::{self, kdf, FileSaltStore};
use crate::store::AppendLog;
use clap::Args;
use std::path::PathBuf;
use tokio::task;

/// decrypt サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct DecryptArgs {
    /// Directory holding salt.bin and aqi_log.enc
    #[arg(short, long, default_value = ".", env = "AQIMON_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Key-derivation password
    #[arg(
        long,
        default_value = DEFAULT_PASSWORD,
        env = "AQIMON_PASSWORD",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub password: String,
}

/// 1行分の復号結果
#[derive(Debug)]
pub struct DecryptedLine {
    /// ログ内の行番号（1始まり、空行を除く）
    pub line_no: usize,
    /// 平文レコード、または復号エラー
    pub result: AqiResult<String>,
}

/// 復号結果の集計
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecryptSummary {
    /// 復号に成功した行数
    pub decrypted: usize,
    /// 復号に失敗した行数
    pub failed: usize,
}

/// ログ全体を復号する
///
/// 行ごとの失敗は `DecryptedLine::result` に格納し、全体は失敗させない。
pub async fn decrypt_log(args: &DecryptArgs) -> AqiResult<Vec<DecryptedLine>> {
    let store = FileSaltStore::new(args.data_dir.join(SALT_FILE_NAME));
    let password = args.password.clone();
    let key = task::spawn_blocking(move || kdf::derive_existing_key(&password, &store))
        .await
        .map_err(|err| AqiError::KeyDerivation(format!("key derivation task failed: {err}")))??;

    let log = AppendLog::new(args.data_dir.join(LOG_FILE_NAME));
    let lines = log
        .read_lines()
        .await?
        .ok_or_else(|| AqiError::NotFound(format!("{}", log.path().display())))?;

    Ok(lines
        .iter()
        .enumerate()
        .map(|(idx, line)| DecryptedLine {
            line_no: idx + 1,
            result: std::str::from_utf8(line)
                .map_err(|e| AqiError::Decryption(format!("line is not valid UTF-8: {e}")))
                .and_then(|text| crypto::decrypt_record(text, &key)),
        })
        .collect())
}

/// Execute the decrypt command
pub async fn execute(args: &DecryptArgs) -> AqiResult<DecryptSummary> {
    let mut summary = DecryptSummary::default();
    for line in decrypt_log(args).await? {
        match line.result {
            Ok(record) => {
                println!("{}", record);
                summary.decrypted += 1;
            }
            Err(e) => {
                eprintln!("line {}: {}", line.line_no, e);
                summary.failed += 1;
            }
        }
    }
    eprintln!(
        "{} record(s) decrypted, {} failed",
        summary.decrypted, summary.failed
    );
    Ok(summary)
}
