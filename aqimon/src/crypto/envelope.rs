//! レコード暗号化エンベロープ
//!
//! 1レコード = 1エンベロープ。フォーマット:
//!
//! ```text
//! base64(iv[16] || AES-256-CBC/PKCS7(plaintext))
//! ```
//!
//! IVは呼び出しごとにOS乱数から生成し、各エンベロープは他のレコードに
//! 依存せず単独で復号できる。認証タグは持たない（DESIGN.md参照）。

use crate::common::error::{AqiError, AqiResult};
use crate::config::IV_LENGTH_BYTES;
use crate::crypto::kdf::SecretKey;
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AESブロック長
const BLOCK_LEN: usize = 16;

/// IVと暗号文の組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// 初期化ベクトル
    pub iv: [u8; IV_LENGTH_BYTES],
    /// 暗号文（PKCS7パディング込み）
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// `iv || ciphertext` の生バイト列
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(IV_LENGTH_BYTES + self.ciphertext.len());
        bytes.extend_from_slice(&self.iv);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// 行として保存できるbase64テキスト
    pub fn to_text(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// 生バイト列を先頭IVと残りの暗号文に分割
    pub fn from_bytes(bytes: &[u8]) -> AqiResult<Self> {
        if bytes.len() < IV_LENGTH_BYTES {
            return Err(AqiError::Decryption(format!(
                "envelope is {} bytes, shorter than the {}-byte IV",
                bytes.len(),
                IV_LENGTH_BYTES
            )));
        }

        let (iv_bytes, ciphertext) = bytes.split_at(IV_LENGTH_BYTES);
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
            return Err(AqiError::Decryption(format!(
                "ciphertext length {} is not a positive multiple of {}",
                ciphertext.len(),
                BLOCK_LEN
            )));
        }

        let mut iv = [0u8; IV_LENGTH_BYTES];
        iv.copy_from_slice(iv_bytes);
        Ok(Self {
            iv,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// base64テキスト（1行）からデコード
    pub fn from_text(text: &str) -> AqiResult<Self> {
        let bytes = STANDARD
            .decode(text.trim())
            .map_err(|e| AqiError::Decryption(format!("invalid base64: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

/// 平文を暗号化してエンベロープを作成
///
/// 平文の内容は検証しない。任意のバイト列を受け付ける。
pub fn seal(plaintext: &[u8], key: &SecretKey) -> AqiResult<Envelope> {
    let mut iv = [0u8; IV_LENGTH_BYTES];
    OsRng
        .try_fill_bytes(&mut iv)
        .map_err(|e| AqiError::Encryption(format!("secure random unavailable: {e}")))?;

    let cipher = Aes256CbcEnc::new_from_slices(key.as_bytes(), &iv)
        .map_err(|e| AqiError::Encryption(format!("invalid key/iv length: {e}")))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    Ok(Envelope { iv, ciphertext })
}

/// エンベロープを復号
pub fn open(envelope: &Envelope, key: &SecretKey) -> AqiResult<Vec<u8>> {
    let cipher = Aes256CbcDec::new_from_slices(key.as_bytes(), &envelope.iv)
        .map_err(|e| AqiError::Decryption(format!("invalid key/iv length: {e}")))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(&envelope.ciphertext)
        .map_err(|_| AqiError::Decryption("invalid padding (wrong key or tampered record)".into()))
}

/// 平文を暗号化し、ログ1行分のテキストを返す
pub fn encrypt(plaintext: &[u8], key: &SecretKey) -> AqiResult<String> {
    seal(plaintext, key).map(|envelope| envelope.to_text())
}

/// ログ1行分のテキストを復号して平文バイト列を返す
pub fn decrypt(envelope_text: &str, key: &SecretKey) -> AqiResult<Vec<u8>> {
    open(&Envelope::from_text(envelope_text)?, key)
}

/// ログ1行分のテキストを復号してUTF-8レコードとして返す
pub fn decrypt_record(envelope_text: &str, key: &SecretKey) -> AqiResult<String> {
    String::from_utf8(decrypt(envelope_text, key)?)
        .map_err(|e| AqiError::Decryption(format!("record is not valid UTF-8: {e}")))
}
