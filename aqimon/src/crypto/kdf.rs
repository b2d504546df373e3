//! パスワードベース鍵導出
//!
//! 永続化されたソルトとパスワードからPBKDF2-HMAC-SHA256で256bit鍵を導出する。
//! ソルトは初回起動時にのみ生成・保存され、以降は再利用される
//! （ソルトが変わると既存ログが復号できなくなるため）。

use crate::common::error::{AqiError, AqiResult};
use crate::config::{ITERATION_COUNT, KEY_LENGTH_BYTES, SALT_LENGTH_BYTES};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// ソルトの永続化先
pub trait SaltStore: Send + Sync {
    /// 保存済みソルトを読み込む（未作成なら `Ok(None)`）
    fn load(&self) -> AqiResult<Option<Vec<u8>>>;

    /// ソルトを保存する
    fn persist(&self, salt: &[u8]) -> AqiResult<()>;
}

/// ファイルベースのソルトストア
#[derive(Debug, Clone)]
pub struct FileSaltStore {
    path: PathBuf,
}

impl FileSaltStore {
    /// 指定パスのソルトストアを作成
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// ソルトファイルのパス
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaltStore for FileSaltStore {
    fn load(&self) -> AqiResult<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AqiError::KeyDerivation(format!(
                "failed to read salt {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn persist(&self, salt: &[u8]) -> AqiResult<()> {
        let to_error = |e: std::io::Error| {
            AqiError::KeyDerivation(format!(
                "failed to write salt {}: {}",
                self.path.display(),
                e
            ))
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(to_error)?;
            }
        }

        // 既存ソルトの上書きは過去ログを読めなくするので create_new
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .map_err(to_error)?;
        file.write_all(salt).map_err(to_error)?;
        file.sync_all().map_err(to_error)?;
        Ok(())
    }
}

/// メモリ上のソルトストア（テスト・組み込み用途）
#[derive(Debug, Default)]
pub struct MemorySaltStore {
    salt: Mutex<Option<Vec<u8>>>,
}

impl MemorySaltStore {
    /// 既知のソルトで初期化
    pub fn with_salt(salt: &[u8]) -> Self {
        Self {
            salt: Mutex::new(Some(salt.to_vec())),
        }
    }
}

impl SaltStore for MemorySaltStore {
    fn load(&self) -> AqiResult<Option<Vec<u8>>> {
        self.salt
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| AqiError::KeyDerivation("salt store lock poisoned".to_string()))
    }

    fn persist(&self, salt: &[u8]) -> AqiResult<()> {
        let mut guard = self
            .salt
            .lock()
            .map_err(|_| AqiError::KeyDerivation("salt store lock poisoned".to_string()))?;
        *guard = Some(salt.to_vec());
        Ok(())
    }
}

/// 導出済み対称鍵
///
/// プロセスメモリ上にのみ保持され、Drop時にゼロ化される。
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: [u8; KEY_LENGTH_BYTES],
}

impl SecretKey {
    /// 生の鍵バイトから作成
    pub fn from_bytes(bytes: [u8; KEY_LENGTH_BYTES]) -> Self {
        Self { bytes }
    }

    /// 鍵バイトを参照
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH_BYTES] {
        &self.bytes
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        // 定数時間比較
        self.bytes
            .iter()
            .zip(other.bytes.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl Eq for SecretKey {}

/// パスワードとソルトから鍵を導出（純粋関数）
pub fn derive_key_with_salt(password: &str, salt: &[u8]) -> AqiResult<SecretKey> {
    if salt.is_empty() {
        return Err(AqiError::KeyDerivation("salt is empty".to_string()));
    }

    let mut bytes = [0u8; KEY_LENGTH_BYTES];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, ITERATION_COUNT, &mut bytes);
    let key = SecretKey::from_bytes(bytes);
    bytes.zeroize();
    Ok(key)
}

/// ソルトを読み込み、なければ生成して保存する
pub fn load_or_create_salt(store: &dyn SaltStore) -> AqiResult<Vec<u8>> {
    if let Some(salt) = store.load()? {
        debug!(len = salt.len(), "Loaded existing salt");
        return Ok(salt);
    }

    let mut salt = vec![0u8; SALT_LENGTH_BYTES];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| AqiError::KeyDerivation(format!("secure random unavailable: {e}")))?;
    store.persist(&salt)?;
    info!("No salt found. Generated and saved a new one.");
    Ok(salt)
}

/// 鍵を導出する（ソルトが無ければ生成・保存）
///
/// 起動時に一度だけ呼び出す。失敗は致命的で、サーバーを起動してはならない。
pub fn derive_key(password: &str, store: &dyn SaltStore) -> AqiResult<SecretKey> {
    let salt = load_or_create_salt(store)?;
    derive_key_with_salt(password, &salt)
}

/// 既存ソルトのみを使って鍵を導出する（ソルトを新規作成しない）
///
/// 復号用途。新しいソルトを作ると既存ログが永久に読めなくなるため。
pub fn derive_existing_key(password: &str, store: &dyn SaltStore) -> AqiResult<SecretKey> {
    let salt = store
        .load()?
        .ok_or_else(|| AqiError::KeyDerivation("no salt found; nothing to decrypt".to_string()))?;
    derive_key_with_salt(password, &salt)
}
