//! 再起動をまたいだソルト・ログの継続性

use crate::support::monitor::{init_monitor, test_config};
use aqimon::crypto::{self, kdf, FileSaltStore};
use tempfile::tempdir;

#[tokio::test]
async fn restart_reuses_salt_and_appends_to_existing_log() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());

    let first = init_monitor(&config, &[60.0]).await;
    first.sampler.tick().await.unwrap();
    let salt_before = std::fs::read(config.salt_path()).unwrap();
    drop(first);

    let second = init_monitor(&config, &[160.0]).await;
    second.sampler.tick().await.unwrap();
    assert_eq!(std::fs::read(config.salt_path()).unwrap(), salt_before);

    let key = kdf::derive_existing_key("sid1234", &FileSaltStore::new(config.salt_path())).unwrap();
    let lines = second.state.surface.log_bytes().await.unwrap().unwrap();
    let text = String::from_utf8(lines).unwrap();
    let records: Vec<String> = text
        .lines()
        .map(|line| crypto::decrypt_record(line, &key).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert!(records[0].ends_with("AQI: 60.0 [Normal]"));
    assert!(records[1].ends_with("AQI: 160.0 [⚠️ HIGH POLLUTION]"));
}

#[tokio::test]
async fn wrong_password_cannot_decrypt_existing_records() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let ctx = init_monitor(&config, &[80.0]).await;
    ctx.sampler.tick().await.unwrap();

    let store = FileSaltStore::new(config.salt_path());
    let wrong = kdf::derive_existing_key("not-the-password", &store).unwrap();
    let right = kdf::derive_existing_key("sid1234", &store).unwrap();
    assert_ne!(wrong, right);

    let text = String::from_utf8(ctx.state.surface.log_bytes().await.unwrap().unwrap()).unwrap();
    let line = text.lines().next().unwrap();
    assert!(crypto::decrypt_record(line, &right).is_ok());
    assert_ne!(
        crypto::decrypt_record(line, &wrong).ok().as_deref(),
        crypto::decrypt_record(line, &right).ok().as_deref()
    );
}
