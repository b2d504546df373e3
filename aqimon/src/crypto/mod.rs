//! 暗号化ログの鍵導出とエンベロープ

/// PBKDF2鍵導出とソルト永続化
pub mod kdf;

/// AES-256-CBCエンベロープ
pub mod envelope;

pub use envelope::{decrypt, decrypt_record, encrypt, Envelope};
pub use kdf::{derive_key, FileSaltStore, MemorySaltStore, SaltStore, SecretKey};
